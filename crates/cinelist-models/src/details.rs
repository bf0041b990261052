use serde::{Deserialize, Serialize};
use crate::title::Title;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Genre {
    pub id: u32,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductionCompany {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub logo_path: Option<String>,
    #[serde(default)]
    pub origin_country: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Network {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub logo_path: Option<String>,
    #[serde(default)]
    pub origin_country: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CastMember {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub character: String,
    #[serde(default)]
    pub profile_path: Option<String>,
    #[serde(default)]
    pub order: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CrewMember {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub job: String,
    #[serde(default)]
    pub department: String,
    #[serde(default)]
    pub profile_path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Credits {
    #[serde(default)]
    pub cast: Vec<CastMember>,
    #[serde(default)]
    pub crew: Vec<CrewMember>,
}

/// Expanded detail record for a movie or series (`/movie/{id}`, `/tv/{id}`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct TitleDetails {
    #[serde(flatten)]
    pub summary: Title,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runtime: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revenue: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tagline: Option<String>,
    #[serde(default)]
    pub genres: Vec<Genre>,
    #[serde(default)]
    pub production_companies: Vec<ProductionCompany>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credits: Option<Credits>,

    // Series only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_air_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number_of_seasons: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number_of_episodes: Option<u32>,
    #[serde(default)]
    pub networks: Vec<Network>,
}

impl TitleDetails {
    pub fn genre_names(&self) -> Option<String> {
        if self.genres.is_empty() {
            return None;
        }
        Some(
            self.genres
                .iter()
                .map(|g| g.name.as_str())
                .collect::<Vec<_>>()
                .join(", "),
        )
    }

    /// First `limit` cast members in billing order
    pub fn main_cast(&self, limit: usize) -> Vec<&CastMember> {
        let Some(credits) = &self.credits else {
            return Vec::new();
        };
        let mut cast: Vec<&CastMember> = credits.cast.iter().collect();
        cast.sort_by_key(|c| c.order);
        cast.truncate(limit);
        cast
    }

    pub fn director(&self) -> Option<&CrewMember> {
        self.credits
            .as_ref()?
            .crew
            .iter()
            .find(|c| c.job == "Director")
    }

    pub fn has_cast(&self) -> bool {
        self.credits.as_ref().map(|c| !c.cast.is_empty()).unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MOVIE_DETAILS: &str = r#"{
        "id": 550,
        "title": "Fight Club",
        "overview": "A ticking-time-bomb insomniac...",
        "poster_path": "/pB8BM7pdSp6B6Ih7QZ4DrQ3PmJK.jpg",
        "backdrop_path": "/hZkgoQYus5vegHoetLkCJzb17zJ.jpg",
        "release_date": "1999-10-15",
        "vote_average": 8.433,
        "runtime": 139,
        "tagline": "Mischief. Mayhem. Soap.",
        "genres": [{"id": 18, "name": "Drama"}, {"id": 53, "name": "Thriller"}],
        "credits": {
            "cast": [
                {"id": 819, "name": "Edward Norton", "character": "The Narrator", "order": 0},
                {"id": 1283, "name": "Helena Bonham Carter", "character": "Marla Singer", "order": 2},
                {"id": 287, "name": "Brad Pitt", "character": "Tyler Durden", "order": 1},
                {"id": 7470, "name": "Meat Loaf", "character": "Robert 'Bob' Paulson", "order": 3}
            ],
            "crew": [
                {"id": 7467, "name": "David Fincher", "job": "Director", "department": "Directing"},
                {"id": 7474, "name": "Ross Grayson Bell", "job": "Producer", "department": "Production"}
            ]
        }
    }"#;

    #[test]
    fn test_details_accessors() {
        let details: TitleDetails = serde_json::from_str(MOVIE_DETAILS).unwrap();
        assert_eq!(details.summary.display_name(), "Fight Club");
        assert_eq!(details.runtime, Some(139));
        assert_eq!(details.genre_names().as_deref(), Some("Drama, Thriller"));

        let cast: Vec<&str> = details.main_cast(3).iter().map(|c| c.name.as_str()).collect();
        assert_eq!(cast, vec!["Edward Norton", "Brad Pitt", "Helena Bonham Carter"]);
        assert_eq!(details.director().map(|d| d.name.as_str()), Some("David Fincher"));
        assert!(details.has_cast());
    }

    #[test]
    fn test_details_without_credits() {
        let details: TitleDetails =
            serde_json::from_str(r#"{"id": 1399, "name": "Game of Thrones", "number_of_seasons": 8}"#).unwrap();
        assert_eq!(details.genre_names(), None);
        assert!(details.main_cast(3).is_empty());
        assert!(details.director().is_none());
        assert!(!details.has_cast());
        assert_eq!(details.number_of_seasons, Some(8));
    }
}
