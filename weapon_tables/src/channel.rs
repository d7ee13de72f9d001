//! Cross-addon weapon registration
//!
//! Other packs register or override weapons by sending a JSON message on a
//! named channel. The payload carries WeaponStats records; the `before_effect`
//! and `script` fields name hooks that the receiving engine already knows.
//! Function source text is rejected, never evaluated.

use crate::ChannelError;
use serde::{Deserialize, Serialize};
use weapon_core::WeaponStats;

/// Channel name external packs send registrations on
pub const REGISTER_WEAPONS_CHANNEL: &str = "sweep-and-slash:register-weapons";

/// A registration message as sent by an external pack
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistrationMessage {
    pub channel: String,
    pub weapons: Vec<WeaponStats>,
}

impl RegistrationMessage {
    pub fn new(weapons: Vec<WeaponStats>) -> Self {
        RegistrationMessage {
            channel: REGISTER_WEAPONS_CHANNEL.to_string(),
            weapons,
        }
    }

    pub fn to_json(&self) -> Result<String, ChannelError> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Decode and validate a registration payload
pub fn decode_registration(payload: &str) -> Result<Vec<WeaponStats>, ChannelError> {
    let message: RegistrationMessage = serde_json::from_str(payload)?;
    if message.channel != REGISTER_WEAPONS_CHANNEL {
        return Err(ChannelError::UnknownChannel(message.channel));
    }

    for weapon in &message.weapons {
        weapon.validate().map_err(ChannelError::Validation)?;
        for hook in [&weapon.before_effect, &weapon.script].into_iter().flatten() {
            if !is_hook_name(hook) {
                return Err(ChannelError::Validation(format!(
                    "{}: hook fields must name a registered hook, got code",
                    weapon.id
                )));
            }
        }
    }

    Ok(message.weapons)
}

/// Hook names are identifiers, optionally namespaced (`pack:hook_name`)
fn is_hook_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | ':' | '.'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_roundtrip_message() {
        let message = RegistrationMessage::new(vec![
            WeaponStats::new("pack:spear", 1.2, 7.0).with_before_effect("pack:lunge")
        ]);
        let weapons = decode_registration(&message.to_json().unwrap()).unwrap();
        assert_eq!(weapons.len(), 1);
        assert_eq!(weapons[0].before_effect.as_deref(), Some("pack:lunge"));
    }

    #[test]
    fn test_decode_camel_case_payload() {
        let payload = r#"{
            "channel": "sweep-and-slash:register-weapons",
            "weapons": [
                {"id": "pack:knife", "attackSpeed": 1.8, "damage": 4, "isWeapon": true}
            ]
        }"#;
        let weapons = decode_registration(payload).unwrap();
        assert!(weapons[0].is_weapon);
    }

    #[test]
    fn test_rejects_wrong_channel() {
        let payload = r#"{"channel": "other", "weapons": []}"#;
        assert!(matches!(
            decode_registration(payload),
            Err(ChannelError::UnknownChannel(_))
        ));
    }

    #[test]
    fn test_rejects_function_source() {
        let payload = r#"{
            "channel": "sweep-and-slash:register-weapons",
            "weapons": [
                {"id": "pack:evil", "attackSpeed": 1, "damage": 1,
                 "script": "({ player }) => player.kill()"}
            ]
        }"#;
        assert!(matches!(
            decode_registration(payload),
            Err(ChannelError::Validation(_))
        ));
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(matches!(
            decode_registration("{not json"),
            Err(ChannelError::Json(_))
        ));
    }
}
