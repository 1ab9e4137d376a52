use super::*;
use crate::foundation::core::Size;

fn snap(tag: u8) -> DisplayBitmap {
    let size = Size::new(2, 1).unwrap();
    DisplayBitmap::from_rgba8_premul(size, vec![tag, tag, tag, tag, 0, 0, 0, 0]).unwrap()
}

fn draw(tag: u8) -> HistoryEntry {
    HistoryEntry::Draw {
        snapshot: snap(tag),
    }
}

#[test]
fn starts_with_single_clear_entry() {
    let h = History::new();
    assert_eq!(h.len(), 1);
    assert_eq!(h.index(), 0);
    assert_eq!(h.current(), &HistoryEntry::Clear);
    assert!(!h.can_undo());
    assert!(!h.can_redo());
}

#[test]
fn undo_and_redo_are_noops_at_the_ends() {
    let mut h = History::new();
    assert!(h.undo().is_none());
    assert!(h.redo().is_none());

    h.push(draw(1));
    assert!(h.redo().is_none());
    assert_eq!(h.undo(), Some(&HistoryEntry::Clear));
    assert!(h.undo().is_none());
    assert_eq!(h.index(), 0);
}

#[test]
fn push_after_undo_prunes_redo_branch() {
    let mut h = History::new();
    h.push(draw(1));
    h.push(draw(2));
    h.push(draw(3));
    h.undo();
    h.undo();
    assert_eq!(h.index(), 1);

    h.push(draw(9));
    assert_eq!(h.len(), 3);
    assert_eq!(h.index(), 2);
    assert!(h.redo().is_none());
    assert_eq!(h.current(), &draw(9));
}

#[test]
fn seal_replaces_open_draw_snapshot() {
    let mut h = History::new();
    assert!(h.seal(snap(5)).is_err());

    h.push(draw(1));
    h.seal(snap(7)).unwrap();
    assert_eq!(h.current(), &draw(7));
}

#[test]
fn apply_restores_snapshot_or_clears() {
    let mut bmp = snap(0);
    draw(4).apply_to(&mut bmp).unwrap();
    assert_eq!(bmp, snap(4));

    HistoryEntry::Clear.apply_to(&mut bmp).unwrap();
    assert!(bmp.is_blank());

    let mut other = DisplayBitmap::new(Size::new(3, 3).unwrap());
    assert!(draw(1).apply_to(&mut other).is_err());
}

#[test]
fn reset_returns_to_initial_state() {
    let mut h = History::new();
    h.push(draw(1));
    h.push(HistoryEntry::Clear);
    h.reset();
    assert_eq!(h.len(), 1);
    assert_eq!(h.current(), &HistoryEntry::Clear);
}

#[test]
fn oldest_entries_are_dropped_past_the_limit() {
    let mut h = History::with_limit(3);
    for tag in 1..=5 {
        h.push(draw(tag));
    }
    assert_eq!(h.len(), 3);
    assert_eq!(h.index(), 2);

    // Oldest surviving state becomes the new base.
    assert_eq!(h.undo(), Some(&draw(4)));
    assert_eq!(h.undo(), Some(&draw(3)));
    assert!(h.undo().is_none());
    assert_eq!(h.redo(), Some(&draw(4)));
    assert_eq!(h.redo(), Some(&draw(5)));
}

#[test]
fn limit_survives_reset_and_has_a_floor() {
    let mut h = History::with_limit(4);
    h.push(draw(1));
    h.reset();
    assert_eq!(h.max_entries(), 4);
    assert_eq!(h.len(), 1);

    let mut tiny = History::with_limit(0);
    assert_eq!(tiny.max_entries(), 2);
    tiny.push(draw(1));
    tiny.push(draw(2));
    assert_eq!(tiny.len(), 2);
    assert_eq!(tiny.undo(), Some(&draw(1)));
    assert_eq!(History::new().max_entries(), DEFAULT_MAX_HISTORY_ENTRIES);
}
