//! Pre-screening gate applied before a respondent is scored.
//!
//! Each check is a pure function returning the [`DisqualificationReason`] it
//! guards. [`screen`] runs them in a fixed order and reports the first
//! failure. Titles and messages are the Portuguese copy shown to respondents.
//!
//! # Examples
//! ```
//! use chrono::NaiveDate;
//! use persona_core::{DisqualificationReason, Eligibility, ScreeningAnswers, screen};
//!
//! let today = NaiveDate::from_ymd_opt(2025, 6, 1).expect("valid date");
//! let answers = ScreeningAnswers {
//!     birth_date: NaiveDate::from_ymd_opt(1990, 3, 14).expect("valid date"),
//!     subscription_status: "Sim, sou assinante atual".into(),
//!     play_frequency: "Raramente".into(),
//!     recent_participation: false,
//!     streamer: false,
//!     social_posting: "Não".into(),
//!     household_registered: false,
//! };
//! assert_eq!(
//!     screen(&answers, today),
//!     Eligibility::Ineligible(DisqualificationReason::LowGamingFrequency),
//! );
//! ```

use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Youngest eligible age.
pub const MIN_AGE: i32 = 18;
/// Oldest eligible age.
pub const MAX_AGE: i32 = 64;

/// Subscription answers that pass the gate.
pub const VALID_SUBSCRIPTION_STATUSES: [&str; 2] = [
    "Sim, sou assinante atual",
    "Fui assinante nos últimos 6 meses",
];

/// Play-frequency answers that fail the gate.
pub const INSUFFICIENT_PLAY_FREQUENCIES: [&str; 2] = ["Raramente", "Nunca"];

/// Social-posting answers that fail the gate.
pub const DISQUALIFYING_SOCIAL_POSTING: [&str; 2] = ["Sim, frequentemente", "Sim, ocasionalmente"];

/// Screening questions answered before the questionnaire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreeningAnswers {
    /// Date of birth.
    pub birth_date: NaiveDate,
    /// Streaming subscription status as worded on the form.
    pub subscription_status: String,
    /// How often the respondent plays.
    pub play_frequency: String,
    /// Whether the respondent joined similar research recently.
    pub recent_participation: bool,
    /// Whether the respondent is an active streamer.
    pub streamer: bool,
    /// Whether the respondent posts about games on social media.
    pub social_posting: String,
    /// Whether the household already has a registered participant.
    ///
    /// Callers with access to the candidate store fill this in.
    #[serde(default)]
    pub household_registered: bool,
}

/// Reason a respondent was screened out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisqualificationReason {
    /// Younger than 18.
    AgeUnder,
    /// Older than 64.
    AgeOver,
    /// Not a current or recent subscriber.
    NoNetflix,
    /// Plays rarely or never.
    LowGamingFrequency,
    /// Took part in similar research in the last six months.
    RecentResearch,
    /// Active streamer.
    IsStreamer,
    /// Posts about games on social media.
    ActiveSocialPoster,
    /// Someone at the same address is already registered.
    DuplicateAddress,
}

impl DisqualificationReason {
    /// Machine-readable reason code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::AgeUnder => "age_under",
            Self::AgeOver => "age_over",
            Self::NoNetflix => "no_netflix",
            Self::LowGamingFrequency => "low_gaming_frequency",
            Self::RecentResearch => "recent_research",
            Self::IsStreamer => "is_streamer",
            Self::ActiveSocialPoster => "active_social_poster",
            Self::DuplicateAddress => "duplicate_address",
        }
    }

    /// Short heading shown to the respondent.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::AgeUnder => "Idade Mínima Não Atingida",
            Self::AgeOver => "Idade Máxima Excedida",
            Self::NoNetflix => "Assinatura Netflix Necessária",
            Self::LowGamingFrequency => "Frequência de Jogo Insuficiente",
            Self::RecentResearch => "Participação Recente",
            Self::IsStreamer => "Streamers Não Elegíveis",
            Self::ActiveSocialPoster => "Atividade em Redes Sociais",
            Self::DuplicateAddress => "Endereço Já Cadastrado",
        }
    }

    /// Explanation shown to the respondent.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::AgeUnder => "Você precisa ter pelo menos 18 anos para participar desta pesquisa.",
            Self::AgeOver => "Infelizmente, esta pesquisa é destinada a pessoas com até 64 anos.",
            Self::NoNetflix => {
                "É necessário ser assinante atual da Netflix ou ter sido assinante nos últimos 6 meses."
            }
            Self::LowGamingFrequency => {
                "É necessário jogar pelo menos mensalmente em qualquer dispositivo."
            }
            Self::RecentResearch => {
                "Você participou de uma pesquisa similar recentemente. Aguarde 6 meses para participar novamente."
            }
            Self::IsStreamer => "Streamers ativos não podem participar desta pesquisa.",
            Self::ActiveSocialPoster => {
                "Pessoas que postam ativamente sobre games não podem participar desta pesquisa."
            }
            Self::DuplicateAddress => {
                "Já existe um participante cadastrado neste endereço. Apenas um participante por domicílio é permitido."
            }
        }
    }
}

impl fmt::Display for DisqualificationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Outcome of the eligibility gate.
///
/// Serialises as an [`EligibilityReport`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(into = "EligibilityReport")]
pub enum Eligibility {
    /// Every check passed.
    Eligible,
    /// The first failing check.
    Ineligible(DisqualificationReason),
}

impl Eligibility {
    /// Whether the respondent may continue to the questionnaire.
    #[must_use]
    pub const fn is_eligible(self) -> bool {
        matches!(self, Self::Eligible)
    }

    /// Reason for rejection, if any.
    #[must_use]
    pub const fn reason(self) -> Option<DisqualificationReason> {
        match self {
            Self::Eligible => None,
            Self::Ineligible(reason) => Some(reason),
        }
    }
}

impl From<Result<(), DisqualificationReason>> for Eligibility {
    fn from(result: Result<(), DisqualificationReason>) -> Self {
        match result {
            Ok(()) => Self::Eligible,
            Err(reason) => Self::Ineligible(reason),
        }
    }
}

/// Flat report of an [`Eligibility`] outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EligibilityReport {
    /// Whether every check passed.
    pub eligible: bool,
    /// Failing reason code.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub reason: Option<DisqualificationReason>,
    /// Heading for the failing reason.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub title: Option<String>,
    /// Message for the failing reason.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub message: Option<String>,
}

impl From<Eligibility> for EligibilityReport {
    fn from(eligibility: Eligibility) -> Self {
        let reason = eligibility.reason();
        Self {
            eligible: reason.is_none(),
            reason,
            title: reason.map(|r| r.title().to_owned()),
            message: reason.map(|r| r.message().to_owned()),
        }
    }
}

/// Age in whole years on `today`, counting a birthday only once reached.
#[must_use]
pub fn age_on(birth_date: NaiveDate, today: NaiveDate) -> i32 {
    let age = today.year() - birth_date.year();
    if (today.month(), today.day()) < (birth_date.month(), birth_date.day()) {
        age - 1
    } else {
        age
    }
}

/// Reject respondents younger than 18 or older than 64.
///
/// # Errors
///
/// Returns [`DisqualificationReason::AgeUnder`] or
/// [`DisqualificationReason::AgeOver`].
pub fn check_age(birth_date: NaiveDate, today: NaiveDate) -> Result<(), DisqualificationReason> {
    match age_on(birth_date, today) {
        age if age < MIN_AGE => Err(DisqualificationReason::AgeUnder),
        age if age > MAX_AGE => Err(DisqualificationReason::AgeOver),
        _ => Ok(()),
    }
}

/// Require a current or recent subscription.
///
/// # Errors
///
/// Returns [`DisqualificationReason::NoNetflix`].
pub fn check_subscription(status: &str) -> Result<(), DisqualificationReason> {
    if VALID_SUBSCRIPTION_STATUSES.contains(&status.trim()) {
        Ok(())
    } else {
        Err(DisqualificationReason::NoNetflix)
    }
}

/// Reject respondents who play rarely or never.
///
/// # Errors
///
/// Returns [`DisqualificationReason::LowGamingFrequency`].
pub fn check_play_frequency(frequency: &str) -> Result<(), DisqualificationReason> {
    if INSUFFICIENT_PLAY_FREQUENCIES.contains(&frequency.trim()) {
        Err(DisqualificationReason::LowGamingFrequency)
    } else {
        Ok(())
    }
}

/// Reject respondents who joined similar research recently.
///
/// # Errors
///
/// Returns [`DisqualificationReason::RecentResearch`].
pub const fn check_recent_participation(participated: bool) -> Result<(), DisqualificationReason> {
    if participated {
        Err(DisqualificationReason::RecentResearch)
    } else {
        Ok(())
    }
}

/// Reject active streamers.
///
/// # Errors
///
/// Returns [`DisqualificationReason::IsStreamer`].
pub const fn check_streamer(streamer: bool) -> Result<(), DisqualificationReason> {
    if streamer {
        Err(DisqualificationReason::IsStreamer)
    } else {
        Ok(())
    }
}

/// Reject respondents who post about games on social media.
///
/// # Errors
///
/// Returns [`DisqualificationReason::ActiveSocialPoster`].
pub fn check_social_posting(activity: &str) -> Result<(), DisqualificationReason> {
    if DISQUALIFYING_SOCIAL_POSTING.contains(&activity.trim()) {
        Err(DisqualificationReason::ActiveSocialPoster)
    } else {
        Ok(())
    }
}

/// Allow one participant per household.
///
/// # Errors
///
/// Returns [`DisqualificationReason::DuplicateAddress`].
pub const fn check_household(already_registered: bool) -> Result<(), DisqualificationReason> {
    if already_registered {
        Err(DisqualificationReason::DuplicateAddress)
    } else {
        Ok(())
    }
}

/// Run every check in order and report the first failure.
#[must_use]
pub fn screen(answers: &ScreeningAnswers, today: NaiveDate) -> Eligibility {
    check_age(answers.birth_date, today)
        .and_then(|()| check_subscription(&answers.subscription_status))
        .and_then(|()| check_play_frequency(&answers.play_frequency))
        .and_then(|()| check_recent_participation(answers.recent_participation))
        .and_then(|()| check_streamer(answers.streamer))
        .and_then(|()| check_social_posting(&answers.social_posting))
        .and_then(|()| check_household(answers.household_registered))
        .into()
}
