use std::collections::BTreeMap;

use crate::models::Seat;

/// Derived view over the seat list: the sample space for a draw.
///
/// Rebuilt wholesale every time the seat list is loaded; holds indices into
/// the original ordering so "near the winner" biasing works on pool order.
#[derive(Debug)]
pub struct EligiblePool<'a> {
    seats: Vec<&'a Seat>,
}

impl<'a> EligiblePool<'a> {
    pub fn from_seats(seats: &'a [Seat]) -> Self {
        Self {
            seats: seats.iter().filter(|s| s.is_eligible).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.seats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seats.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&'a Seat> {
        self.seats.get(index).copied()
    }

    /// Позиция места в пуле (для ручного розыгрыша)
    pub fn index_of(&self, seat_id: i64) -> Option<usize> {
        self.seats.iter().position(|s| s.id == seat_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a Seat> + '_ {
        self.seats.iter().copied()
    }
}

/// One row of a section in theater-layout order.
#[derive(Debug, Clone, PartialEq)]
pub struct RowGroup<'a> {
    pub row_label: &'a str,
    pub seats: Vec<&'a Seat>,
}

/// Seats of one section, rows sorted lexicographically, seats within a row
/// sorted numerically ascending. Purely presentational.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionGroup<'a> {
    pub section_id: i64,
    pub rows: Vec<RowGroup<'a>>,
}

/// Группировка мест для отображения зала: секция -> ряд -> места.
/// Порядок детерминирован при любом порядке входного списка.
pub fn group_for_layout(seats: &[Seat]) -> Vec<SectionGroup<'_>> {
    let mut by_section: BTreeMap<i64, BTreeMap<&str, Vec<&Seat>>> = BTreeMap::new();
    for seat in seats {
        by_section
            .entry(seat.section_id)
            .or_default()
            .entry(seat.row_label.as_str())
            .or_default()
            .push(seat);
    }

    by_section
        .into_iter()
        .map(|(section_id, rows)| SectionGroup {
            section_id,
            rows: rows
                .into_iter()
                .map(|(row_label, mut row_seats)| {
                    row_seats.sort_by_key(|s| s.seat_number);
                    RowGroup {
                        row_label,
                        seats: row_seats,
                    }
                })
                .collect(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seat(id: i64, section_id: i64, row: &str, number: i32, eligible: bool) -> Seat {
        Seat {
            id,
            section_id,
            row_label: row.to_string(),
            seat_number: number,
            attendee_name: eligible.then(|| format!("Guest {id}")),
            is_excluded: false,
            is_eligible: eligible,
        }
    }

    #[test]
    fn pool_contains_only_eligible_seats() {
        let seats = vec![
            seat(1, 1, "A", 1, true),
            seat(2, 1, "A", 2, false),
            seat(3, 1, "B", 1, true),
        ];
        let pool = EligiblePool::from_seats(&seats);
        assert_eq!(pool.len(), 2);
        assert!(pool.iter().all(|s| s.is_eligible));
        assert_eq!(pool.index_of(3), Some(1));
        assert_eq!(pool.index_of(2), None);
    }

    #[test]
    fn empty_seat_list_gives_empty_pool() {
        let pool = EligiblePool::from_seats(&[]);
        assert!(pool.is_empty());
        assert!(pool.get(0).is_none());
    }

    #[test]
    fn grouping_sorts_rows_lexicographically_and_seats_numerically() {
        let seats = vec![
            seat(1, 2, "B", 3, true),
            seat(2, 2, "A", 10, true),
            seat(3, 2, "A", 2, true),
            seat(4, 1, "C", 1, false),
            seat(5, 2, "B", 1, true),
        ];
        let groups = group_for_layout(&seats);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].section_id, 1);
        assert_eq!(groups[1].section_id, 2);

        let rows: Vec<&str> = groups[1].rows.iter().map(|r| r.row_label).collect();
        assert_eq!(rows, vec!["A", "B"]);

        let row_a: Vec<i32> = groups[1].rows[0].seats.iter().map(|s| s.seat_number).collect();
        assert_eq!(row_a, vec![2, 10]);
        let row_b: Vec<i32> = groups[1].rows[1].seats.iter().map(|s| s.seat_number).collect();
        assert_eq!(row_b, vec![1, 3]);
    }

    #[test]
    fn grouping_is_deterministic_across_input_orderings() {
        let mut seats = vec![
            seat(1, 1, "B", 2, true),
            seat(2, 1, "A", 1, true),
            seat(3, 2, "A", 5, false),
        ];
        let first = format!("{:?}", group_for_layout(&seats));
        assert_eq!(first, format!("{:?}", group_for_layout(&seats)));

        // Sorted output must not depend on input order either
        seats.reverse();
        assert_eq!(first, format!("{:?}", group_for_layout(&seats)));
    }
}
