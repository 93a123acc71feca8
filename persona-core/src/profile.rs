//! Behavioural profiles a respondent can be classified into.
//!
//! The enum order is the canonical scan order used for tie-breaking, so
//! [`Profile::ALL`] must never be reordered.
//!
//! # Examples
//! ```
//! use persona_core::Profile;
//!
//! assert_eq!(Profile::Mechanist.as_str(), "Mechanist");
//! assert_eq!("collaborators".parse::<Profile>(), Ok(Profile::Collaborator));
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One of the five behavioural profiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Profile {
    /// Players driven by emotional connection with characters and stories.
    Empath,
    /// Explorers looking for novelty, discovery and freedom.
    Pioneer,
    /// Players focused on mastering mechanics and systems.
    Mechanist,
    /// Players who value shared, cooperative and social play.
    Collaborator,
    /// Players looking for comfort, creativity and relaxing play.
    Nester,
}

impl Profile {
    /// Every profile in canonical order.
    pub const ALL: [Self; 5] = [
        Self::Empath,
        Self::Pioneer,
        Self::Mechanist,
        Self::Collaborator,
        Self::Nester,
    ];

    /// Number of profiles.
    pub const COUNT: usize = Self::ALL.len();

    /// Return the singular profile name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Empath => "Empath",
            Self::Pioneer => "Pioneer",
            Self::Mechanist => "Mechanist",
            Self::Collaborator => "Collaborator",
            Self::Nester => "Nester",
        }
    }

    /// Return the plural name used by exported coefficient sheets.
    #[must_use]
    pub const fn plural(self) -> &'static str {
        match self {
            Self::Empath => "Empaths",
            Self::Pioneer => "Pioneers",
            Self::Mechanist => "Mechanists",
            Self::Collaborator => "Collaborators",
            Self::Nester => "Nesters",
        }
    }

    /// Position of the profile in [`Profile::ALL`].
    #[must_use]
    pub const fn position(self) -> usize {
        match self {
            Self::Empath => 0,
            Self::Pioneer => 1,
            Self::Mechanist => 2,
            Self::Collaborator => 3,
            Self::Nester => 4,
        }
    }

    /// Respondent-facing copy describing the profile.
    #[must_use]
    pub const fn description(self) -> &'static ProfileDescription {
        match self {
            Self::Empath => &EMPATH,
            Self::Pioneer => &PIONEER,
            Self::Mechanist => &MECHANIST,
            Self::Collaborator => &COLLABORATOR,
            Self::Nester => &NESTER,
        }
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a profile name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown profile '{name}'")]
pub struct ParseProfileError {
    /// The rejected name.
    pub name: String,
}

impl FromStr for Profile {
    type Err = ParseProfileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|profile| {
                trimmed.eq_ignore_ascii_case(profile.as_str())
                    || trimmed.eq_ignore_ascii_case(profile.plural())
            })
            .ok_or_else(|| ParseProfileError {
                name: trimmed.to_owned(),
            })
    }
}

/// Static description shown to a classified respondent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileDescription {
    /// Display name including the Portuguese translation.
    pub name: &'static str,
    /// One-paragraph description.
    pub description: &'static str,
    /// Typical characteristics.
    pub characteristics: &'static [&'static str],
    /// Suggested careers.
    pub career_recommendations: &'static [&'static str],
}

static EMPATH: ProfileDescription = ProfileDescription {
    name: "Empath (Empático)",
    description: "Jogadores que valorizam profundamente a conexão emocional com personagens e \
                  narrativas. Buscam experiências que despertem emoções fortes e histórias \
                  envolventes que os façam refletir sobre a condição humana.",
    characteristics: &[
        "Alta valorização de histórias que despertam emoções fortes",
        "Preferência por personagens bem desenvolvidos e relacionáveis",
        "Interesse em narrativas com consequências emocionais",
        "Apreciação por momentos icônicos e memoráveis",
        "Foco em experiências narrativas imersivas",
    ],
    career_recommendations: &[
        "Roteirista de jogos narrativos",
        "Designer de personagens e narrativa",
        "Diretor criativo de experiências emocionais",
        "Consultor de narrativa para jogos story-driven",
        "Desenvolvedor de jogos indie com foco em história",
    ],
};

static PIONEER: ProfileDescription = ProfileDescription {
    name: "Pioneer (Pioneiro)",
    description: "Exploradores natos que buscam constantemente novas experiências e desafios. \
                  Valorizam a inovação, a descoberta e a liberdade para explorar mundos vastos \
                  e sistemas complexos.",
    characteristics: &[
        "Forte interesse em exploração e descoberta",
        "Preferência por mundos abertos e não-lineares",
        "Valorização de inovação e mecânicas únicas",
        "Busca por experiências que oferecem liberdade",
        "Interesse em sistemas complexos e experimentação",
    ],
    career_recommendations: &[
        "Designer de mundo aberto",
        "Arquiteto de sistemas de jogo",
        "Designer de exploração e progressão",
        "Desenvolvedor de mecânicas inovadoras",
        "Consultor de design de experiência de usuário",
    ],
};

static MECHANIST: ProfileDescription = ProfileDescription {
    name: "Mechanist (Mecanicista)",
    description: "Jogadores focados em dominar mecânicas e sistemas de jogo. Apreciam desafios \
                  técnicos, otimização e a satisfação de melhorar suas habilidades através da \
                  prática e estratégia.",
    characteristics: &[
        "Foco em mecânicas de jogo e sistemas",
        "Valorização de desafio e skill ceiling",
        "Interesse em otimização e eficiência",
        "Preferência por feedback claro de progressão",
        "Apreciação por sistemas de jogo profundos",
    ],
    career_recommendations: &[
        "Designer de mecânicas de gameplay",
        "Balanceador de sistemas de jogo",
        "Designer de progressão e recompensas",
        "Desenvolvedor de sistemas de combate",
        "QA especializado em gameplay",
    ],
};

static COLLABORATOR: ProfileDescription = ProfileDescription {
    name: "Collaborator (Colaborador)",
    description: "Jogadores que encontram maior satisfação em experiências compartilhadas e \
                  cooperação. Valorizam a construção de comunidades, trabalho em equipe e \
                  interações sociais significativas.",
    characteristics: &[
        "Forte valorização de experiências cooperativas",
        "Interesse em construir e manter comunidades",
        "Preferência por jogos com componentes sociais",
        "Apreciação por trabalho em equipe e coordenação",
        "Foco em interações multiplayer positivas",
    ],
    career_recommendations: &[
        "Designer de sistemas multiplayer",
        "Community manager",
        "Designer de experiências sociais",
        "Desenvolvedor de features cooperativas",
        "Especialista em engajamento de comunidade",
    ],
};

static NESTER: ProfileDescription = ProfileDescription {
    name: "Nester (Aninhador)",
    description: "Jogadores que buscam conforto, familiaridade e experiências relaxantes. \
                  Preferem ambientes acolhedores onde podem se expressar criativamente e \
                  construir seu próprio espaço seguro.",
    characteristics: &[
        "Preferência por experiências confortáveis e relaxantes",
        "Interesse em customização e expressão pessoal",
        "Valorização de ambientes acolhedores",
        "Foco em criatividade e construção",
        "Apreciação por jogos com ritmo mais tranquilo",
    ],
    career_recommendations: &[
        "Designer de sistemas de customização",
        "Desenvolvedor de jogos casuais",
        "Designer de experiências relaxantes",
        "Especialista em sistemas de crafting/building",
        "Designer de ambientes e atmosfera",
    ],
};

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Empath", Profile::Empath)]
    #[case("empaths", Profile::Empath)]
    #[case(" PIONEERS ", Profile::Pioneer)]
    #[case("Mechanist", Profile::Mechanist)]
    #[case("collaborator", Profile::Collaborator)]
    #[case("Nesters", Profile::Nester)]
    fn parses_singular_and_plural_names(#[case] raw: &str, #[case] expected: Profile) {
        assert_eq!(raw.parse::<Profile>(), Ok(expected));
    }

    #[test]
    fn parsing_rejects_unknown() {
        let err = "Wanderer".parse::<Profile>().unwrap_err();
        assert_eq!(err.name, "Wanderer");
    }

    #[test]
    fn positions_follow_canonical_order() {
        for (index, profile) in Profile::ALL.into_iter().enumerate() {
            assert_eq!(profile.position(), index);
        }
    }

    #[test]
    fn every_profile_has_copy() {
        for profile in Profile::ALL {
            let description = profile.description();
            assert!(description.name.starts_with(profile.as_str()));
            assert_eq!(description.characteristics.len(), 5);
            assert_eq!(description.career_recommendations.len(), 5);
        }
    }

    #[test]
    fn serialises_as_singular_name() {
        let json = serde_json::to_string(&Profile::Nester).expect("serialise profile");
        assert_eq!(json, "\"Nester\"");
    }
}
