//! Closed vocabularies for enumerable request parameters.
//!
//! Each vocabulary parses from its canonical upstream spelling (exact,
//! case-sensitive) and serializes back to it. Parse failures produce
//! [`HuginnError::InvalidValue`] naming the offending token, which the
//! HTTP layer surfaces as a 400.

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

use crate::{HuginnError, Result};

/// AniList genre.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Genre {
    Action,
    Adventure,
    Cars,
    Comedy,
    Drama,
    Fantasy,
    Horror,
    MahouShoujo,
    Mecha,
    Music,
    Mystery,
    Psychological,
    Romance,
    SciFi,
    SliceOfLife,
    Sports,
    Supernatural,
    Thriller,
}

impl Genre {
    pub const ALL: &'static [Genre] = &[
        Genre::Action,
        Genre::Adventure,
        Genre::Cars,
        Genre::Comedy,
        Genre::Drama,
        Genre::Fantasy,
        Genre::Horror,
        Genre::MahouShoujo,
        Genre::Mecha,
        Genre::Music,
        Genre::Mystery,
        Genre::Psychological,
        Genre::Romance,
        Genre::SciFi,
        Genre::SliceOfLife,
        Genre::Sports,
        Genre::Supernatural,
        Genre::Thriller,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Action => "Action",
            Self::Adventure => "Adventure",
            Self::Cars => "Cars",
            Self::Comedy => "Comedy",
            Self::Drama => "Drama",
            Self::Fantasy => "Fantasy",
            Self::Horror => "Horror",
            Self::MahouShoujo => "Mahou Shoujo",
            Self::Mecha => "Mecha",
            Self::Music => "Music",
            Self::Mystery => "Mystery",
            Self::Psychological => "Psychological",
            Self::Romance => "Romance",
            Self::SciFi => "Sci-Fi",
            Self::SliceOfLife => "Slice of Life",
            Self::Sports => "Sports",
            Self::Supernatural => "Supernatural",
            Self::Thriller => "Thriller",
        }
    }
}

/// Airing season.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Season {
    Winter,
    Spring,
    Summer,
    Fall,
}

impl Season {
    pub const ALL: &'static [Season] = &[
        Season::Winter,
        Season::Spring,
        Season::Summer,
        Season::Fall,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Winter => "WINTER",
            Self::Spring => "SPRING",
            Self::Summer => "SUMMER",
            Self::Fall => "FALL",
        }
    }
}

/// AniList `MediaSort` key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaSort {
    Id,
    IdDesc,
    TitleRomaji,
    TitleRomajiDesc,
    TitleEnglish,
    TitleEnglishDesc,
    TitleNative,
    TitleNativeDesc,
    Type,
    TypeDesc,
    Format,
    FormatDesc,
    StartDate,
    StartDateDesc,
    EndDate,
    EndDateDesc,
    Score,
    ScoreDesc,
    Popularity,
    PopularityDesc,
    Trending,
    TrendingDesc,
    Episodes,
    EpisodesDesc,
    Duration,
    DurationDesc,
    Status,
    StatusDesc,
    UpdatedAt,
    UpdatedAtDesc,
    SearchMatch,
    Favourites,
    FavouritesDesc,
}

impl MediaSort {
    pub const ALL: &'static [MediaSort] = &[
        MediaSort::Id,
        MediaSort::IdDesc,
        MediaSort::TitleRomaji,
        MediaSort::TitleRomajiDesc,
        MediaSort::TitleEnglish,
        MediaSort::TitleEnglishDesc,
        MediaSort::TitleNative,
        MediaSort::TitleNativeDesc,
        MediaSort::Type,
        MediaSort::TypeDesc,
        MediaSort::Format,
        MediaSort::FormatDesc,
        MediaSort::StartDate,
        MediaSort::StartDateDesc,
        MediaSort::EndDate,
        MediaSort::EndDateDesc,
        MediaSort::Score,
        MediaSort::ScoreDesc,
        MediaSort::Popularity,
        MediaSort::PopularityDesc,
        MediaSort::Trending,
        MediaSort::TrendingDesc,
        MediaSort::Episodes,
        MediaSort::EpisodesDesc,
        MediaSort::Duration,
        MediaSort::DurationDesc,
        MediaSort::Status,
        MediaSort::StatusDesc,
        MediaSort::UpdatedAt,
        MediaSort::UpdatedAtDesc,
        MediaSort::SearchMatch,
        MediaSort::Favourites,
        MediaSort::FavouritesDesc,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Id => "ID",
            Self::IdDesc => "ID_DESC",
            Self::TitleRomaji => "TITLE_ROMAJI",
            Self::TitleRomajiDesc => "TITLE_ROMAJI_DESC",
            Self::TitleEnglish => "TITLE_ENGLISH",
            Self::TitleEnglishDesc => "TITLE_ENGLISH_DESC",
            Self::TitleNative => "TITLE_NATIVE",
            Self::TitleNativeDesc => "TITLE_NATIVE_DESC",
            Self::Type => "TYPE",
            Self::TypeDesc => "TYPE_DESC",
            Self::Format => "FORMAT",
            Self::FormatDesc => "FORMAT_DESC",
            Self::StartDate => "START_DATE",
            Self::StartDateDesc => "START_DATE_DESC",
            Self::EndDate => "END_DATE",
            Self::EndDateDesc => "END_DATE_DESC",
            Self::Score => "SCORE",
            Self::ScoreDesc => "SCORE_DESC",
            Self::Popularity => "POPULARITY",
            Self::PopularityDesc => "POPULARITY_DESC",
            Self::Trending => "TRENDING",
            Self::TrendingDesc => "TRENDING_DESC",
            Self::Episodes => "EPISODES",
            Self::EpisodesDesc => "EPISODES_DESC",
            Self::Duration => "DURATION",
            Self::DurationDesc => "DURATION_DESC",
            Self::Status => "STATUS",
            Self::StatusDesc => "STATUS_DESC",
            Self::UpdatedAt => "UPDATED_AT",
            Self::UpdatedAtDesc => "UPDATED_AT_DESC",
            Self::SearchMatch => "SEARCH_MATCH",
            Self::Favourites => "FAVOURITES",
            Self::FavouritesDesc => "FAVOURITES_DESC",
        }
    }
}

/// Find the vocabulary member spelled exactly `s`.
fn lookup<T: Copy>(
    all: &[T],
    as_str: impl Fn(&T) -> &'static str,
    kind: &'static str,
    s: &str,
) -> Result<T> {
    all.iter()
        .copied()
        .find(|member| as_str(member) == s)
        .ok_or_else(|| HuginnError::InvalidValue {
            kind,
            value: s.to_string(),
        })
}

impl FromStr for Genre {
    type Err = HuginnError;

    fn from_str(s: &str) -> Result<Self> {
        lookup(Self::ALL, Self::as_str, "genre", s)
    }
}

impl FromStr for Season {
    type Err = HuginnError;

    fn from_str(s: &str) -> Result<Self> {
        lookup(Self::ALL, Self::as_str, "season", s)
    }
}

impl FromStr for MediaSort {
    type Err = HuginnError;

    fn from_str(s: &str) -> Result<Self> {
        lookup(Self::ALL, Self::as_str, "sort", s)
    }
}

impl fmt::Display for Genre {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for MediaSort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Genre {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl Serialize for Season {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl Serialize for MediaSort {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Decode a JSON-encoded list payload (e.g. `["Action","Drama"]`).
///
/// List parameters travel as a single query value holding a JSON array of
/// strings. Anything else is a [`HuginnError::MalformedParameter`].
pub fn decode_list(param: &'static str, raw: &str) -> Result<Vec<String>> {
    serde_json::from_str::<Vec<String>>(raw).map_err(|e| HuginnError::MalformedParameter {
        param,
        reason: e.to_string(),
    })
}

/// Decode and validate a JSON-encoded genre list.
///
/// Every member is checked; the first invalid token, wherever it sits in
/// the list, is reported.
pub fn parse_genres(raw: &str) -> Result<Vec<Genre>> {
    decode_list("genres", raw)?
        .iter()
        .map(|g| g.parse())
        .collect()
}

/// Decode and validate a JSON-encoded sort-key list.
pub fn parse_sort(raw: &str) -> Result<Vec<MediaSort>> {
    decode_list("sort", raw)?
        .iter()
        .map(|s| s.parse())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn genre_round_trips_through_canonical_spelling() {
        for genre in Genre::ALL {
            assert_eq!(genre.as_str().parse::<Genre>().unwrap(), *genre);
        }
    }

    #[test]
    fn genre_match_is_case_sensitive() {
        assert!("action".parse::<Genre>().is_err());
        assert_eq!("Slice of Life".parse::<Genre>().unwrap(), Genre::SliceOfLife);
    }

    #[test]
    fn invalid_season_names_value() {
        let err = "AUTUMN".parse::<Season>().unwrap_err();
        assert_eq!(err.to_string(), "AUTUMN is not a valid season");
    }

    #[test]
    fn sort_keys_parse() {
        assert_eq!(
            "POPULARITY_DESC".parse::<MediaSort>().unwrap(),
            MediaSort::PopularityDesc
        );
        assert!("MOST_LIKED".parse::<MediaSort>().is_err());
    }

    #[test]
    fn genre_list_reports_first_invalid_member() {
        let err = parse_genres(r#"["Action","Isekai","Drama","Nope"]"#).unwrap_err();
        assert_eq!(err.to_string(), "Isekai is not a valid genre");
    }

    #[test]
    fn genre_list_invalid_in_last_position() {
        let err = parse_genres(r#"["Action","Drama","Isekai"]"#).unwrap_err();
        assert!(matches!(err, HuginnError::InvalidValue { kind: "genre", ref value } if value == "Isekai"));
    }

    #[test]
    fn malformed_list_is_rejected() {
        let err = parse_genres("Action,Drama").unwrap_err();
        assert!(matches!(err, HuginnError::MalformedParameter { param: "genres", .. }));
    }

    #[test]
    fn serializes_to_canonical_spelling() {
        let json = serde_json::to_string(&vec![Genre::SciFi, Genre::MahouShoujo]).unwrap();
        assert_eq!(json, r#"["Sci-Fi","Mahou Shoujo"]"#);
    }
}
