//! Game analytics provider tools
//!
//! Static data loading is a dedicated RPC method on this provider; the
//! analysis tools go through `tools/call` with the planner's arguments
//! passed through untouched.

use serde_json::{json, Value};

use plan_relay_core::Args;

use crate::args::{ArgReader, DecodeError, DecodeResult};
use crate::ProviderTool;

#[derive(Debug, Clone, PartialEq)]
pub enum LolTool {
    FetchStaticData {
        ddragon_version: String,
        lang: String,
    },
    AnalyzeEnemies(Args),
    SuggestItems(Args),
    SuggestRunes(Args),
    SuggestSummoners(Args),
    PlanBuild(Args),
}

impl LolTool {
    /// JSON-RPC method and params for this call.
    pub fn request(&self) -> (&'static str, Value) {
        match self {
            Self::FetchStaticData { .. } => (self.name(), self.arguments()),
            _ => (
                "tools/call",
                json!({"name": self.name(), "arguments": self.arguments()}),
            ),
        }
    }
}

impl ProviderTool for LolTool {
    fn decode(tool: &str, args: &Args) -> DecodeResult<Self> {
        let reader = ArgReader::new(tool, args);
        let passthrough = args.clone();
        match tool {
            "fetch_static_data" => Ok(Self::FetchStaticData {
                ddragon_version: reader.str_or("ddragon_version", "latest")?,
                lang: reader.str_or("lang", "en_US")?,
            }),
            "analyze_enemies" => Ok(Self::AnalyzeEnemies(passthrough)),
            "suggest_items" => Ok(Self::SuggestItems(passthrough)),
            "suggest_runes" => Ok(Self::SuggestRunes(passthrough)),
            "suggest_summoners" => Ok(Self::SuggestSummoners(passthrough)),
            "plan_build" => Ok(Self::PlanBuild(passthrough)),
            other => Err(DecodeError::Unsupported {
                tool: other.to_string(),
            }),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Self::FetchStaticData { .. } => "fetch_static_data",
            Self::AnalyzeEnemies(_) => "analyze_enemies",
            Self::SuggestItems(_) => "suggest_items",
            Self::SuggestRunes(_) => "suggest_runes",
            Self::SuggestSummoners(_) => "suggest_summoners",
            Self::PlanBuild(_) => "plan_build",
        }
    }

    fn arguments(&self) -> Value {
        match self {
            Self::FetchStaticData {
                ddragon_version,
                lang,
            } => json!({"ddragon_version": ddragon_version, "lang": lang}),
            Self::AnalyzeEnemies(args)
            | Self::SuggestItems(args)
            | Self::SuggestRunes(args)
            | Self::SuggestSummoners(args)
            | Self::PlanBuild(args) => Value::Object(args.clone()),
        }
    }
}
