//! Weapon name normalization and coarse bucketing.
//!
//! Decoders report weapon names in several spellings ("weapon_m4a1_silencer",
//! "M4A1-S", "m4a1"). Buckets collapse them into the classes duel segments
//! are keyed by.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse weapon class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum WeaponBucket {
    AK,
    M4,
    AWP,
    Scout,
    Deagle,
    Pistol,
    SMG,
    Rifle,
    ScopedRifle,
    Shotgun,
    MachineGun,
    AutoSniper,
    Other,
}

impl std::str::FromStr for WeaponBucket {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = normalize_weapon_name(s);

        if name.starts_with("m4") {
            return Ok(Self::M4);
        }

        Ok(match name.as_str() {
            "ak47" | "ak" => Self::AK,
            "awp" => Self::AWP,
            "ssg08" | "scout" => Self::Scout,
            "deagle" | "deserteagle" | "revolver" | "r8revolver" => Self::Deagle,
            "glock" | "glock18" | "usp" | "usps" | "uspsilencer" | "hkp2000" | "p2000"
            | "p250" | "cz75a" | "cz75auto" | "fiveseven" | "tec9" | "elite"
            | "dualberettas" => Self::Pistol,
            "mac10" | "mp9" | "mp7" | "mp5sd" | "ump45" | "p90" | "bizon" | "ppbizon" => {
                Self::SMG
            }
            "galilar" | "galil" | "famas" => Self::Rifle,
            "aug" | "sg556" | "sg553" => Self::ScopedRifle,
            "nova" | "xm1014" | "mag7" | "sawedoff" => Self::Shotgun,
            "m249" | "negev" => Self::MachineGun,
            "scar20" | "g3sg1" => Self::AutoSniper,
            _ => Self::Other,
        })
    }
}

impl WeaponBucket {
    /// Bucket a raw weapon name
    pub fn classify(weapon: &str) -> Self {
        weapon.parse().unwrap_or(Self::Other)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::AK => "AK",
            Self::M4 => "M4",
            Self::AWP => "AWP",
            Self::Scout => "Scout",
            Self::Deagle => "Deagle",
            Self::Pistol => "Pistol",
            Self::SMG => "SMG",
            Self::Rifle => "Rifle",
            Self::ScopedRifle => "Scoped Rifle",
            Self::Shotgun => "Shotgun",
            Self::MachineGun => "MG",
            Self::AutoSniper => "Auto",
            Self::Other => "Other",
        }
    }
}

impl fmt::Display for WeaponBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a weapon is the sniper-class weapon for AWP statistics
pub fn is_awp(weapon: &str) -> bool {
    WeaponBucket::classify(weapon) == WeaponBucket::AWP
}

/// Lowercase, drop the "weapon_" prefix and any separators
///
/// "weapon_m4a1_silencer" -> "m4a1silencer", "M4A1-S" -> "m4a1s"
pub fn normalize_weapon_name(weapon: &str) -> String {
    let lower = weapon.trim().to_lowercase();
    let stripped = lower.strip_prefix("weapon_").unwrap_or(&lower);
    stripped.chars().filter(|c| c.is_ascii_alphanumeric()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_m4_variants_share_bucket() {
        assert_eq!(WeaponBucket::classify("M4A1-S"), WeaponBucket::M4);
        assert_eq!(WeaponBucket::classify("M4A4"), WeaponBucket::M4);
        assert_eq!(WeaponBucket::classify("weapon_m4a1_silencer"), WeaponBucket::M4);
    }

    #[test]
    fn test_unknown_weapon_is_other() {
        assert_eq!(WeaponBucket::classify("laser_rifle"), WeaponBucket::Other);
        assert_eq!(WeaponBucket::classify(""), WeaponBucket::Other);
        assert_eq!(WeaponBucket::classify("knife"), WeaponBucket::Other);
    }

    #[test]
    fn test_small_pistols() {
        for name in ["Glock-18", "USP-S", "P2000", "P250", "CZ75-Auto", "Five-SeveN", "Tec-9", "Dual Berettas"] {
            assert_eq!(WeaponBucket::classify(name), WeaponBucket::Pistol, "{}", name);
        }
        assert_eq!(WeaponBucket::classify("Desert Eagle"), WeaponBucket::Deagle);
    }

    #[test]
    fn test_is_awp() {
        assert!(is_awp("AWP"));
        assert!(is_awp("weapon_awp"));
        assert!(!is_awp("SSG 08"));
    }

    #[test]
    fn test_bucket_labels() {
        assert_eq!(WeaponBucket::classify("ak47").as_str(), "AK");
        assert_eq!(WeaponBucket::ScopedRifle.to_string(), "Scoped Rifle");
    }
}
