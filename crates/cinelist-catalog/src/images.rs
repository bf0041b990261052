/// Full image URL for a TMDB path fragment, e.g. `w500` + `/abc.jpg`
pub fn image_url(base_url: &str, size: &str, path: &str) -> String {
    format!(
        "{}/{}/{}",
        base_url.trim_end_matches('/'),
        size.trim_matches('/'),
        path.trim_start_matches('/')
    )
}
