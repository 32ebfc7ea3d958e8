//! Remote movie catalog tools

use serde_json::{json, Value};

use plan_relay_core::Args;

use crate::args::{ArgReader, DecodeError, DecodeResult};
use crate::ProviderTool;

#[derive(Debug, Clone, PartialEq)]
pub enum MoviesTool {
    SearchMovie { title: String },
    GetRandomMovie,
    GetMovieRecommendations { genres: Vec<String>, min_rating: f64 },
}

impl ProviderTool for MoviesTool {
    fn decode(tool: &str, args: &Args) -> DecodeResult<Self> {
        let reader = ArgReader::new(tool, args);
        match tool {
            "search_movie" => Ok(Self::SearchMovie {
                title: reader.str_or("title", "")?,
            }),
            "get_random_movie" => Ok(Self::GetRandomMovie),
            "get_movie_recommendations" => Ok(Self::GetMovieRecommendations {
                genres: reader.string_list("genres")?,
                min_rating: reader.f64_or("min_rating", 7.0)?,
            }),
            other => Err(DecodeError::Unsupported {
                tool: other.to_string(),
            }),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Self::SearchMovie { .. } => "search_movie",
            Self::GetRandomMovie => "get_random_movie",
            Self::GetMovieRecommendations { .. } => "get_movie_recommendations",
        }
    }

    fn arguments(&self) -> Value {
        match self {
            Self::SearchMovie { title } => json!({"title": title}),
            Self::GetRandomMovie => json!({}),
            Self::GetMovieRecommendations { genres, min_rating } => {
                json!({"genres": genres, "min_rating": min_rating})
            }
        }
    }
}
