use crate::models::{
    CONTEXT_SCORE_MAX, CONTEXT_SCORE_MIN, EnergyLevels, Nutrition, PhysicalActivity, SCORE_MAX,
    SCORE_MIN, SocialInteractions, TimeOutdoors,
};
use serde::Deserialize;

/// `local@domain.tld`, no whitespace, exactly one `@`.
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    pub email: Option<&'static str>,
    pub password: Option<&'static str>,
    pub confirm_password: Option<&'static str>,
}

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.email.is_none() && self.password.is_none() && self.confirm_password.is_none()
    }
}

fn email_error(email: &str) -> Option<&'static str> {
    if email.is_empty() {
        Some("Email is required.")
    } else if !is_valid_email(email) {
        Some("Enter a valid email address.")
    } else {
        None
    }
}

impl LoginForm {
    pub fn validate(&self) -> FieldErrors {
        FieldErrors {
            email: email_error(&self.email),
            password: self.password.is_empty().then_some("Password is required."),
            confirm_password: None,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SignupForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub confirm_password: String,
}

impl SignupForm {
    pub fn validate(&self) -> FieldErrors {
        let confirm_password = if self.confirm_password.is_empty() {
            Some("Please confirm your password.")
        } else if self.password != self.confirm_password {
            Some("Passwords do not match.")
        } else {
            None
        };
        FieldErrors {
            email: email_error(&self.email),
            password: self.password.is_empty().then_some("Password is required."),
            confirm_password,
        }
    }
}

/// Raw submission of the edit page. Context selects post `""` for "unset".
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EnergyForm {
    pub date: String,
    pub physical: i64,
    pub mental: i64,
    pub emotional: i64,
    #[serde(default)]
    pub sleep_quality: Option<i64>,
    #[serde(default)]
    pub stress_level: Option<i64>,
    #[serde(default)]
    pub physical_activity: String,
    #[serde(default)]
    pub nutrition: String,
    #[serde(default)]
    pub social_interactions: String,
    #[serde(default)]
    pub time_outdoors: String,
    #[serde(default)]
    pub notes: String,
    /// Which submit button was pressed: `next`, `back` or `save`.
    #[serde(default)]
    pub action: String,
}

fn check_score(name: &str, value: i64, min: i64, max: i64) -> Result<i64, String> {
    if (min..=max).contains(&value) {
        Ok(value)
    } else {
        Err(format!("{name} must be between {min} and {max}"))
    }
}

fn parse_choice<T>(name: &str, value: &str, parse: fn(&str) -> Option<T>) -> Result<Option<T>, String> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    parse(value)
        .map(Some)
        .ok_or_else(|| format!("{name} has an unknown value"))
}

impl EnergyForm {
    pub fn into_levels(self) -> Result<EnergyLevels, String> {
        let context = |name: &str, value: Option<i64>| {
            value
                .map(|value| check_score(name, value, CONTEXT_SCORE_MIN, CONTEXT_SCORE_MAX))
                .transpose()
        };
        let notes = self.notes.trim();

        Ok(EnergyLevels {
            date: self.date.trim().to_string(),
            physical: check_score("physical", self.physical, SCORE_MIN, SCORE_MAX)?,
            mental: check_score("mental", self.mental, SCORE_MIN, SCORE_MAX)?,
            emotional: check_score("emotional", self.emotional, SCORE_MIN, SCORE_MAX)?,
            sleep_quality: context("sleep quality", self.sleep_quality)?,
            stress_level: context("stress level", self.stress_level)?,
            physical_activity: parse_choice(
                "physical activity",
                &self.physical_activity,
                PhysicalActivity::parse,
            )?,
            nutrition: parse_choice("nutrition", &self.nutrition, Nutrition::parse)?,
            social_interactions: parse_choice(
                "social interactions",
                &self.social_interactions,
                SocialInteractions::parse,
            )?,
            time_outdoors: parse_choice("time outdoors", &self.time_outdoors, TimeOutdoors::parse)?,
            notes: (!notes.is_empty()).then(|| notes.to_string()),
        })
    }
}
