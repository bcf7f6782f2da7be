//! `wa.me` deep-link construction for bettor contact shortcuts.
//!
//! Nothing is sent from here; the link opens a prefilled conversation in the
//! caller's own WhatsApp client.

use url::form_urlencoded;

use crate::db::entity::bettors;
use crate::db::entity::sea_orm_active_enums::SlotStatus;
use crate::raffle::types::SlotNumber;

/// Brazilian country prefix, the only one the phone book stores numbers for.
const COUNTRY_CODE: &str = "55";

fn digits_of(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Builds `https://wa.me/55<ddd><phone>?text=<encoded>` for a bettor.
/// Returns `None` when the area code or phone is missing or carries no
/// digits.
pub fn deep_link(bettor: &bettors::Model, message: &str) -> Option<String> {
    let area_code = digits_of(bettor.area_code.as_deref()?);
    let phone = digits_of(bettor.phone.as_deref()?);
    if area_code.is_empty() || phone.is_empty() {
        return None;
    }
    let encoded: String = form_urlencoded::byte_serialize(message.as_bytes()).collect();
    Some(format!(
        "https://wa.me/{COUNTRY_CODE}{area_code}{phone}?text={encoded}"
    ))
}

/// Default notification text: names the bettor by first name and states the
/// number's current standing in its event.
pub fn slot_status_message(
    bettor: &bettors::Model,
    number: &SlotNumber,
    event_name: &str,
    status: SlotStatus,
) -> String {
    let first_name = bettor
        .full_name
        .split_whitespace()
        .next()
        .unwrap_or(&bettor.nickname);
    let standing = match status {
        SlotStatus::Available => "disponível",
        SlotStatus::Reserved => "reservado",
        SlotStatus::Sold => "confirmado",
    };
    format!("Olá {first_name}! Seu número {number} no evento {event_name} está {standing}.")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::entity::sea_orm_active_enums::RecordStatus;

    fn bettor(area_code: Option<&str>, phone: Option<&str>) -> bettors::Model {
        bettors::Model {
            id: 1,
            full_name: "Maria da Silva".into(),
            nickname: "maria".into(),
            area_code: area_code.map(str::to_owned),
            phone: phone.map(str::to_owned),
            email: None,
            address: None,
            status: RecordStatus::Active,
        }
    }

    #[test]
    fn link_strips_formatting_and_encodes_text() {
        let link = deep_link(&bettor(Some("11"), Some("98765-4321")), "Olá Maria");
        assert_eq!(
            link.as_deref(),
            Some("https://wa.me/5511987654321?text=Ol%C3%A1+Maria")
        );
    }

    #[test]
    fn missing_contact_fields_yield_no_link() {
        assert!(deep_link(&bettor(None, Some("987654321")), "oi").is_none());
        assert!(deep_link(&bettor(Some("11"), None), "oi").is_none());
        assert!(deep_link(&bettor(Some("--"), Some("987654321")), "oi").is_none());
    }

    #[test]
    fn message_uses_first_name_and_standing() -> anyhow::Result<()> {
        let text = slot_status_message(
            &bettor(Some("11"), Some("987654321")),
            &SlotNumber::new("042")?,
            "Rifa de Natal",
            SlotStatus::Reserved,
        );
        assert_eq!(
            text,
            "Olá Maria! Seu número 042 no evento Rifa de Natal está reservado."
        );
        Ok(())
    }
}
