use chrono::{Duration, NaiveDate, NaiveTime};
use uuid::Uuid;

use super::DomainError;
use crate::models::{AvailabilitySlot, SlotType};

pub const SYNTHESIZED_SLOT_HOURS: i64 = 2;

/// Slot created when an admin assigns a pandit without picking one.
/// Ends two hours after `start`, wrapping past midnight.
pub fn synthesized_slot(start: NaiveTime) -> (NaiveTime, NaiveTime) {
    (start, start + Duration::hours(SYNTHESIZED_SLOT_HOURS))
}

/// An explicitly chosen slot must belong to the pandit and still be open.
pub fn ensure_slot_assignable(slot: &AvailabilitySlot, pandit_id: Uuid) -> Result<(), DomainError> {
    if slot.pandit_id != pandit_id {
        return Err(DomainError::InvalidSlot(
            "Slot does not belong to the selected pandit".to_string(),
        ));
    }
    if !slot.is_bookable() {
        return Err(DomainError::Conflict(
            "Slot is not available".to_string(),
        ));
    }
    Ok(())
}

/// Half-open ranges `[a_start, a_end)` and `[b_start, b_end)` intersect.
pub fn ranges_overlap(
    a_start: NaiveTime,
    a_end: NaiveTime,
    b_start: NaiveTime,
    b_end: NaiveTime,
) -> bool {
    a_start < b_end && b_start < a_end
}

/// Whether `slot` covers `time` on `date`. A slot with `end <= start` runs
/// past midnight, so it also covers the early hours of the next day.
pub fn covers(slot: &AvailabilitySlot, date: NaiveDate, time: NaiveTime) -> bool {
    let overnight = slot.end_time <= slot.start_time;
    if slot.slot_date == date {
        slot.start_time <= time && (overnight || time < slot.end_time)
    } else {
        overnight && slot.slot_date.succ_opt() == Some(date) && time < slot.end_time
    }
}

/// Whether a pandit can take a booking at `date`/`time`, given their slots
/// reaching into that day: an open slot covering the time, or online with
/// no booked slot covering it.
pub fn available_at(
    is_online: bool,
    slots: &[AvailabilitySlot],
    date: NaiveDate,
    time: NaiveTime,
) -> bool {
    let covering = |s: &&AvailabilitySlot| covers(s, date, time);

    if slots.iter().filter(covering).any(|s| s.is_bookable()) {
        return true;
    }

    is_online
        && !slots
            .iter()
            .filter(covering)
            .any(|s| s.slot_type() == SlotType::Booked)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn synthesized_slot_is_two_hours() {
        assert_eq!(synthesized_slot(t(10, 30)), (t(10, 30), t(12, 30)));
    }

    #[test]
    fn synthesized_slot_wraps_midnight() {
        assert_eq!(synthesized_slot(t(23, 0)), (t(23, 0), t(1, 0)));
        assert_eq!(synthesized_slot(t(22, 0)).1, t(0, 0));
    }

    #[test]
    fn chosen_slot_must_match_pandit_and_be_open() {
        let pandit = Uuid::new_v4();
        let date = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        let mut slot =
            AvailabilitySlot::new(pandit, date, t(9, 0), t(11, 0), SlotType::Available, None);

        assert!(ensure_slot_assignable(&slot, pandit).is_ok());
        assert!(matches!(
            ensure_slot_assignable(&slot, Uuid::new_v4()),
            Err(DomainError::InvalidSlot(_))
        ));

        slot.is_available = false;
        slot.slot_type = SlotType::Booked.as_str().to_string();
        assert!(matches!(
            ensure_slot_assignable(&slot, pandit),
            Err(DomainError::Conflict(_))
        ));
    }

    #[test]
    fn overlap_is_half_open() {
        assert!(ranges_overlap(t(9, 0), t(11, 0), t(10, 0), t(12, 0)));
        assert!(!ranges_overlap(t(9, 0), t(11, 0), t(11, 0), t(12, 0)));
    }

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
    }

    fn slot(pandit: Uuid, start: NaiveTime, end: NaiveTime, kind: SlotType) -> AvailabilitySlot {
        AvailabilitySlot::new(pandit, day(), start, end, kind, None)
    }

    #[test]
    fn covers_is_half_open() {
        let s = slot(Uuid::new_v4(), t(9, 0), t(11, 0), SlotType::Available);
        assert!(covers(&s, day(), t(9, 0)));
        assert!(!covers(&s, day(), t(11, 0)));
        assert!(!covers(&s, day().succ_opt().unwrap(), t(9, 30)));
    }

    #[test]
    fn overnight_slot_covers_the_next_morning_only() {
        let s = slot(Uuid::new_v4(), t(23, 0), t(1, 0), SlotType::Available);
        let next = day().succ_opt().unwrap();

        assert!(covers(&s, day(), t(23, 30)));
        assert!(!covers(&s, day(), t(0, 30)));
        assert!(covers(&s, next, t(0, 30)));
        assert!(!covers(&s, next, t(1, 0)));
        assert!(!covers(&s, next, t(23, 30)));
    }

    #[test]
    fn previous_day_booking_blocks_an_online_pandit_after_midnight() {
        let p = Uuid::new_v4();
        let next = day().succ_opt().unwrap();
        let slots = [slot(p, t(22, 0), t(0, 30), SlotType::Booked)];
        assert!(!available_at(true, &slots, next, t(0, 15)));
        assert!(available_at(true, &slots, next, t(0, 30)));

        let open = [slot(p, t(22, 0), t(2, 0), SlotType::Available)];
        assert!(available_at(false, &open, next, t(1, 0)));
    }

    #[test]
    fn open_slot_makes_pandit_available() {
        let p = Uuid::new_v4();
        let slots = [slot(p, t(9, 0), t(12, 0), SlotType::Available)];
        assert!(available_at(false, &slots, day(), t(10, 0)));
        assert!(!available_at(false, &slots, day(), t(13, 0)));
    }

    #[test]
    fn online_pandit_is_available_unless_booked() {
        let p = Uuid::new_v4();
        let slots = [slot(p, t(9, 0), t(11, 0), SlotType::Booked)];
        assert!(available_at(true, &[], day(), t(10, 0)));
        assert!(!available_at(true, &slots, day(), t(10, 0)));
        assert!(available_at(true, &slots, day(), t(11, 0)));
    }

    #[test]
    fn blocked_slot_does_not_count_as_open() {
        let p = Uuid::new_v4();
        let slots = [slot(p, t(9, 0), t(11, 0), SlotType::Blocked)];
        assert!(!available_at(false, &slots, day(), t(10, 0)));
        assert!(available_at(true, &slots, day(), t(10, 0)));
    }
}
