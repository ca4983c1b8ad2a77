use serde::{Deserialize, Serialize};
use serde_json::Value;

macro_rules! context_enum {
    ($name:ident { $($variant:ident => $wire:literal, $label:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $wire)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn parse(value: &str) -> Option<Self> {
                match value {
                    $($wire => Some(Self::$variant),)+
                    _ => None,
                }
            }

            pub fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $wire,)+
                }
            }

            pub fn label(self) -> &'static str {
                match self {
                    $(Self::$variant => $label,)+
                }
            }
        }
    };
}

context_enum!(PhysicalActivity {
    None => "none", "None",
    Light => "light", "Light",
    Moderate => "moderate", "Moderate",
    Intense => "intense", "Intense",
});

context_enum!(Nutrition {
    Poor => "poor", "Poor quality",
    Average => "average", "Average quality",
    Good => "good", "Good quality",
    Excellent => "excellent", "Excellent quality",
});

context_enum!(SocialInteractions {
    Negative => "negative", "Negative",
    Neutral => "neutral", "Neutral",
    Positive => "positive", "Positive",
});

context_enum!(TimeOutdoors {
    None => "none", "None",
    Under30Min => "under_30min", "Under 30 min",
    From30MinTo1Hr => "30min_1hr", "30 min-1 hr",
    Over1Hr => "over_1hr", "Over 1 hr",
});

pub const SCORE_MIN: i64 = 0;
pub const SCORE_MAX: i64 = 10;
pub const CONTEXT_SCORE_MIN: i64 = 1;
pub const CONTEXT_SCORE_MAX: i64 = 5;

/// One user's self-rating for one calendar day.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnergyLevels {
    pub date: String,
    pub physical: i64,
    pub mental: i64,
    pub emotional: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sleep_quality: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stress_level: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub physical_activity: Option<PhysicalActivity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nutrition: Option<Nutrition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub social_interactions: Option<SocialInteractions>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_outdoors: Option<TimeOutdoors>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl EnergyLevels {
    /// Coerces an untrusted backend payload. Mistyped fields fall back to
    /// defaults instead of failing.
    pub fn from_payload(payload: &Value) -> Self {
        let field = |name: &str| payload.get(name);
        let number = |name: &str| {
            field(name)
                .and_then(Value::as_f64)
                .filter(|value| value.is_finite())
                .map(|value| value.round() as i64)
        };
        let score = |name: &str| number(name).unwrap_or(0);
        let optional_number = |name: &str| number(name);
        let optional_string = |name: &str| {
            field(name)
                .and_then(Value::as_str)
                .filter(|value| !value.is_empty())
                .map(str::to_owned)
        };

        Self {
            date: optional_string("date").unwrap_or_default(),
            physical: score("physical"),
            mental: score("mental"),
            emotional: score("emotional"),
            sleep_quality: optional_number("sleepQuality"),
            stress_level: optional_number("stressLevel"),
            physical_activity: optional_string("physicalActivity")
                .and_then(|value| PhysicalActivity::parse(&value)),
            nutrition: optional_string("nutrition").and_then(|value| Nutrition::parse(&value)),
            social_interactions: optional_string("socialInteractions")
                .and_then(|value| SocialInteractions::parse(&value)),
            time_outdoors: optional_string("timeOutdoors")
                .and_then(|value| TimeOutdoors::parse(&value)),
            notes: optional_string("notes"),
        }
    }

    /// A range payload that is not an array is treated as no data.
    pub fn list_from_payload(payload: &Value) -> Vec<Self> {
        payload
            .as_array()
            .map(|items| items.iter().map(Self::from_payload).collect())
            .unwrap_or_default()
    }

    /// Body for the upsert call: absent and empty optionals are omitted.
    pub fn to_save_body(&self) -> Self {
        Self {
            notes: self.notes.clone().filter(|notes| !notes.is_empty()),
            ..self.clone()
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthTokens {
    pub id_token: String,
    pub refresh_token: String,
    #[serde(default)]
    pub expires_in: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateUserAccepted {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub status: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ActivationResponse {
    #[serde(default)]
    pub message: String,
}

/// The part of `GET /users/me` the client reads.
#[derive(Debug, Clone, Default)]
pub struct Profile {
    pub email: Option<String>,
}

impl Profile {
    pub fn from_payload(payload: &Value) -> Self {
        Self {
            email: payload
                .get("email")
                .and_then(Value::as_str)
                .map(str::to_owned),
        }
    }
}

/// One bar of the time-spending chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpendingSlice {
    pub name: String,
    pub hours: f64,
}
