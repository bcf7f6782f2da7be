use super::error::RaffleError;
use super::types::{NewBettor, NewEvent, RegisterPayment};

pub fn validate_new_bettor(bettor: &NewBettor) -> Result<(), RaffleError> {
    if bettor.full_name.trim().is_empty() {
        return Err(RaffleError::validation("full name is required"));
    }
    if bettor.nickname.trim().is_empty() {
        return Err(RaffleError::validation("nickname is required"));
    }
    if bettor.nickname.contains(char::is_whitespace) {
        return Err(RaffleError::validation("nickname cannot contain spaces"));
    }
    Ok(())
}

pub fn validate_new_event(event: &NewEvent) -> Result<(), RaffleError> {
    if event.name.trim().is_empty() {
        return Err(RaffleError::validation("event name is required"));
    }
    if event.ticket_price <= 0.0 {
        return Err(RaffleError::validation(
            "ticket price must be greater than zero",
        ));
    }
    if event.prize < 0.0 {
        return Err(RaffleError::validation("prize cannot be negative"));
    }
    Ok(())
}

pub fn validate_payment(params: &RegisterPayment) -> Result<(), RaffleError> {
    if params.reference.trim().is_empty() {
        return Err(RaffleError::validation("payment reference is required"));
    }
    if params.nickname.trim().is_empty() {
        return Err(RaffleError::validation("nickname is required"));
    }
    if params.amount < 0.0 {
        return Err(RaffleError::validation("amount cannot be negative"));
    }
    if params.method.trim().is_empty() {
        return Err(RaffleError::validation("payment method is required"));
    }
    if params.numbers.is_empty() {
        return Err(RaffleError::validation(
            "a payment must cover at least one number",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use crate::db::entity::sea_orm_active_enums::EventStatus;

    use super::*;

    fn event() -> NewEvent {
        NewEvent {
            name: "Rifa de Natal".into(),
            kind: "Mensal".into(),
            announcement_date: NaiveDate::from_ymd_opt(2026, 12, 20).unwrap(),
            ticket_price: 10.0,
            prize: 1_000.0,
            floor_prize: None,
            result_number: None,
            description: None,
            draw_reference: None,
            status: EventStatus::Active,
        }
    }

    #[test]
    fn rejects_free_ticket() {
        let mut bad = event();
        bad.ticket_price = 0.0;
        assert!(validate_new_event(&bad).is_err());
        assert!(validate_new_event(&event()).is_ok());
    }

    #[test]
    fn rejects_nickname_with_spaces() {
        let bettor = NewBettor {
            full_name: "Joao Silva".into(),
            nickname: "joao silva".into(),
            area_code: None,
            phone: None,
            email: None,
            address: None,
        };
        assert!(validate_new_bettor(&bettor).is_err());
    }

    #[test]
    fn rejects_empty_number_list() {
        let params = RegisterPayment {
            reference: "PAG-1".into(),
            nickname: "joao".into(),
            amount: 10.0,
            method: "PIX".into(),
            notes: None,
            event_id: 1,
            numbers: Vec::new(),
        };
        assert!(validate_payment(&params).is_err());
    }
}
