use crate::error::ValidationError;
use crate::format::format_currency;
use crate::models::{LotDraft, RegistrationDraft};
use std::collections::HashSet;

/// Trims a bet/recruiter name and checks it against the names already stored.
/// `existing` yields `(id, name)` pairs; `editing_id` is skipped so a record can
/// keep its own name.
pub fn validate_unique_name<'a, I>(
    entity: &'static str,
    name: &str,
    existing: I,
    editing_id: Option<&str>,
) -> Result<String, ValidationError>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyName(entity));
    }

    let lowered = trimmed.to_lowercase();
    let clash = existing
        .into_iter()
        .filter(|(id, _)| Some(*id) != editing_id)
        .any(|(_, other)| other.trim().to_lowercase() == lowered);

    if clash {
        return Err(ValidationError::DuplicateName {
            entity,
            name: trimmed.to_string(),
        });
    }

    Ok(trimmed.to_string())
}

pub fn validate_registration(draft: &RegistrationDraft) -> Result<(), ValidationError> {
    if draft.recruiter_id.trim().is_empty() {
        return Err(ValidationError::MissingReference("recruiter"));
    }
    if draft.bet_id.trim().is_empty() {
        return Err(ValidationError::MissingReference("bet"));
    }
    if draft.value_cents <= 0 {
        return Err(ValidationError::NonPositiveValue);
    }
    Ok(())
}

/// Item values must be unique inside a lot: executed counts are matched by
/// value, so two items with the same value would both claim the same
/// registrations.
pub fn validate_lot(draft: &LotDraft) -> Result<(), ValidationError> {
    if draft.bet_id.trim().is_empty() {
        return Err(ValidationError::MissingReference("bet"));
    }
    if draft.items.is_empty() {
        return Err(ValidationError::EmptyLot);
    }

    let mut seen = HashSet::new();
    for item in &draft.items {
        if item.value_cents <= 0 {
            return Err(ValidationError::NonPositiveValue);
        }
        if item.planned_quantity <= 0 {
            return Err(ValidationError::NonPositiveQuantity);
        }
        if !seen.insert(item.value_cents) {
            return Err(ValidationError::DuplicateLotValue(format_currency(
                item.value_cents,
            )));
        }
    }
    Ok(())
}
