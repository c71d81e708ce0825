//! Property tests for occupancy invariants under arbitrary operation sequences

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::collections::BTreeSet;

use chrono::Utc;
use dorm_core::{
    BedId, BedStatus, Campus, Dormitory, DormitoryId, Occupant, OccupantKind, Room, RoomId,
    RoomType,
};
use proptest::prelude::*;

const ROOMS: usize = 3;
const BEDS_PER_ROOM: usize = 3;
const OCCUPANTS: usize = 6;

fn standard_config() -> ProptestConfig {
    ProptestConfig {
        cases: 100,
        ..ProptestConfig::default()
    }
}

#[derive(Debug, Clone)]
enum Op {
    Assign(usize, usize, usize, bool),
    Hold(usize, usize, usize),
    Release(usize, usize),
    Staff(usize, usize, bool),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0..ROOMS, 0..BEDS_PER_ROOM, 0..OCCUPANTS, any::<bool>())
            .prop_map(|(r, b, o, staff)| Op::Assign(r, b, o, staff)),
        (0..ROOMS, 0..BEDS_PER_ROOM, 0..OCCUPANTS).prop_map(|(r, b, o)| Op::Hold(r, b, o)),
        (0..ROOMS, 0..BEDS_PER_ROOM).prop_map(|(r, b)| Op::Release(r, b)),
        (0..ROOMS, 0..BEDS_PER_ROOM, any::<bool>()).prop_map(|(r, b, f)| Op::Staff(r, b, f)),
    ]
}

fn campus(quota: Option<usize>) -> Campus {
    let room_type = RoomType::new("triple", "Triple", BEDS_PER_ROOM);
    let mut dorm = Dormitory::new("d-1", "North Hall");
    for r in 0..ROOMS {
        let mut room = Room::new(
            format!("r-{r}"),
            format!("{r}"),
            DormitoryId::new("d-1"),
            room_type.id.clone(),
        )
        .furnish(&room_type, Utc::now())
        .expect("fresh room");
        room.quota = quota;
        dorm.add_room(room).expect("unique room");
    }
    Campus::new(vec![room_type], vec![dorm]).expect("valid campus")
}

fn ids(room: usize, bed: usize) -> (RoomId, BedId) {
    (RoomId::new(format!("r-{room}")), BedId::new(format!("r-{room}-{}", bed + 1)))
}

fn occupant(index: usize, staff: bool) -> Occupant {
    let kind = if staff {
        OccupantKind::Staff
    } else {
        OccupantKind::Student
    };
    Occupant::new(format!("o-{index}"), kind)
}

fn apply(campus: &mut Campus, op: &Op) {
    // Failures are expected; invariants must hold either way.
    let _ = match op {
        Op::Assign(r, b, o, staff) => {
            let (room, bed) = ids(*r, *b);
            campus.assign(&room, &bed, &occupant(*o, *staff)).map(|_| ())
        }
        Op::Hold(r, b, o) => {
            let (room, bed) = ids(*r, *b);
            campus.hold(&room, &bed, &occupant(*o, false)).map(|_| ())
        }
        Op::Release(r, b) => {
            let (room, bed) = ids(*r, *b);
            campus.release(&room, &bed).map(|_| ())
        }
        Op::Staff(r, b, flag) => {
            let (room, bed) = ids(*r, *b);
            campus.set_staff_reserved(&room, &bed, *flag)
        }
    };
}

fn check_invariants(campus: &Campus) {
    let mut seen = BTreeSet::new();
    let mut held = 0;

    for dorm in campus.dormitories() {
        for room in dorm.rooms() {
            let staff = room.staff_reserved_count();
            assert!(room.free_beds() + room.registered_count() + staff <= room.capacity());
            assert_eq!(room.capacity(), room.beds().len());

            for bed in room.beds() {
                assert_eq!(bed.status() != BedStatus::Available, bed.occupant().is_some());
                assert_eq!(bed.history().iter().filter(|e| e.is_open()).count(), 1);
                assert!(bed.history().windows(2).all(|w| w[0].from <= w[1].from));
                assert!(bed.history().windows(2).all(|w| w[0].to == Some(w[1].from)));

                if let Some(occupant) = bed.occupant() {
                    assert!(seen.insert(occupant.clone()), "{occupant} holds two beds");
                    held += 1;
                    let location = campus.holdings().location_of(occupant).expect("indexed");
                    assert_eq!(&location.bed, bed.id());
                }
            }
        }
    }
    assert_eq!(campus.holdings().len(), held);
}

proptest! {
    #![proptest_config(standard_config())]

    #[test]
    fn prop_invariants_hold_after_any_sequence(ops in prop::collection::vec(op_strategy(), 0..40)) {
        let mut campus = campus(None);
        for op in &ops {
            apply(&mut campus, op);
            check_invariants(&campus);
        }
    }

    #[test]
    fn prop_quota_never_exceeded(
        quota in 0..=BEDS_PER_ROOM,
        ops in prop::collection::vec(op_strategy(), 0..40),
    ) {
        let mut campus = campus(Some(quota));
        for op in &ops {
            // Flipping the staff flag on a held bed moves it in and out of the quota.
            if matches!(op, Op::Staff(..)) {
                continue;
            }
            apply(&mut campus, op);
            for room in campus.dormitories().iter().flat_map(Dormitory::rooms) {
                prop_assert!(room.held_count() <= quota);
            }
        }
    }

    #[test]
    fn prop_staff_beds_never_assignable_to_students(
        ops in prop::collection::vec(op_strategy(), 0..40),
    ) {
        let mut campus = campus(None);
        for op in &ops {
            apply(&mut campus, op);
        }
        for room in campus.dormitories().iter().flat_map(Dormitory::rooms) {
            prop_assert!(room.assignable_beds().iter().all(|b| !b.reserved_for_staff()));
            prop_assert!(room
                .assignable_beds_for(&occupant(0, false))
                .iter()
                .all(|b| !b.reserved_for_staff()));
        }
    }

    #[test]
    fn prop_assignable_beds_sorted_and_within_quota(
        quota in proptest::option::of(0..=BEDS_PER_ROOM),
        ops in prop::collection::vec(op_strategy(), 0..20),
    ) {
        let mut campus = campus(quota);
        for op in &ops {
            apply(&mut campus, op);
        }
        for room in campus.dormitories().iter().flat_map(Dormitory::rooms) {
            let beds = room.assignable_beds();
            prop_assert!(beds.windows(2).all(|w| w[0].number() < w[1].number()));
            if let Some(quota) = quota {
                prop_assert!(beds.len() <= quota);
            }
            prop_assert!(beds.len() <= room.free_beds());
        }
    }
}
