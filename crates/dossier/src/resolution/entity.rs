use serde::{Deserialize, Serialize};

/// Returned when an employee code does not start with a known entity prefix.
pub const UNKNOWN_ENTITY: &str = "Unknown Entity";

/// The legal entities an employee can belong to, keyed by the first digit of the
/// employee code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LegalEntity {
    AromeoBrands,
    CanaraSecurityPress,
    ManipalDigitalNetwork,
    ManipalPaymentAndIdentitySolutions,
    ManipalTechnologies,
    ManipalMediaNetwork,
    ManipalEnergyAndInfratech,
    QuestProConsultancyServices,
    WesttekEnterprises,
    ZetaCyberSolutions,
}

impl LegalEntity {
    /// Ordered by code prefix, `1` through `9` and then `0`.
    pub const fn ordered() -> [Self; 10] {
        [
            Self::AromeoBrands,
            Self::CanaraSecurityPress,
            Self::ManipalDigitalNetwork,
            Self::ManipalPaymentAndIdentitySolutions,
            Self::ManipalTechnologies,
            Self::ManipalMediaNetwork,
            Self::ManipalEnergyAndInfratech,
            Self::QuestProConsultancyServices,
            Self::WesttekEnterprises,
            Self::ZetaCyberSolutions,
        ]
    }

    /// Ordered by display name, as offered when assigning companies to admins.
    pub fn alphabetical() -> [Self; 10] {
        let mut entities = Self::ordered();
        entities.sort_by_key(|entity| entity.label());
        entities
    }

    pub const fn prefix(self) -> char {
        match self {
            Self::AromeoBrands => '1',
            Self::CanaraSecurityPress => '2',
            Self::ManipalDigitalNetwork => '3',
            Self::ManipalPaymentAndIdentitySolutions => '4',
            Self::ManipalTechnologies => '5',
            Self::ManipalMediaNetwork => '6',
            Self::ManipalEnergyAndInfratech => '7',
            Self::QuestProConsultancyServices => '8',
            Self::WesttekEnterprises => '9',
            Self::ZetaCyberSolutions => '0',
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::AromeoBrands => "Aromeo Brands Private Limited",
            Self::CanaraSecurityPress => "Canara Security Press Limited",
            Self::ManipalDigitalNetwork => "Manipal Digital Network Limited",
            Self::ManipalPaymentAndIdentitySolutions => {
                "Manipal Payment and Identity Solutions Limited"
            }
            Self::ManipalTechnologies => "Manipal Technologies Limited",
            Self::ManipalMediaNetwork => "Manipal Media Network Limited",
            Self::ManipalEnergyAndInfratech => "Manipal Energy & Infratech Limited",
            Self::QuestProConsultancyServices => "QuestPro Consultancy Services Private Limited",
            Self::WesttekEnterprises => "Westtek Enterprises Private Limited",
            Self::ZetaCyberSolutions => "Zeta Cyber Solutions Private Limited",
        }
    }

    pub fn from_prefix(prefix: char) -> Option<Self> {
        Self::ordered()
            .into_iter()
            .find(|entity| entity.prefix() == prefix)
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ordered()
            .into_iter()
            .find(|entity| entity.label() == label)
    }
}

pub fn classify(code: &str) -> Option<LegalEntity> {
    code.chars().next().and_then(LegalEntity::from_prefix)
}

/// Display name of the entity owning `code`, or [`UNKNOWN_ENTITY`].
pub fn classify_entity(code: &str) -> &'static str {
    classify(code).map_or(UNKNOWN_ENTITY, LegalEntity::label)
}
