//! Attendance log pairing
//!
//! Sequential scan over an employee's logs sorted ascending by time: an
//! `in` immediately followed by an `out` forms a pair and both are
//! consumed. An `in` with anything else after it stays open — it is never
//! paired with a later, non-adjacent `out`.

use shared::models::{AttendanceLog, AttendancePair, LogType};

/// Pair completed in/out shifts, most recent first
pub fn pair_logs(logs: &[AttendanceLog]) -> Vec<AttendancePair> {
    let mut sorted: Vec<&AttendanceLog> = logs.iter().collect();
    sorted.sort_by_key(|l| l.timestamp);

    let mut pairs = Vec::new();
    let mut i = 0;
    while i + 1 < sorted.len() {
        if sorted[i].kind == LogType::In && sorted[i + 1].kind == LogType::Out {
            pairs.push(AttendancePair {
                clock_in: sorted[i].timestamp,
                clock_out: sorted[i + 1].timestamp,
            });
            i += 2; // both consumed
        } else {
            i += 1;
        }
    }

    pairs.reverse(); // most recent first
    pairs
}

/// Timestamp of the open (unpaired) `in`, if the trailing log is one
pub fn open_shift_start(logs: &[AttendanceLog]) -> Option<i64> {
    let mut sorted: Vec<&AttendanceLog> = logs.iter().collect();
    sorted.sort_by_key(|l| l.timestamp);
    match sorted.last() {
        Some(last) if last.kind == LogType::In => Some(last.timestamp),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn log(timestamp: i64, kind: LogType) -> AttendanceLog {
        AttendanceLog {
            id: timestamp,
            employee_ref: 1,
            timestamp,
            kind,
            employee_name: "Test Employee".into(),
            employee_position: "Miner".into(),
            notes: None,
        }
    }

    #[test]
    fn trailing_in_stays_unpaired() {
        let logs = vec![
            log(1, LogType::In),
            log(2, LogType::Out),
            log(3, LogType::In),
        ];
        let pairs = pair_logs(&logs);
        assert_eq!(
            pairs,
            vec![AttendancePair {
                clock_in: 1,
                clock_out: 2
            }]
        );
        assert_eq!(open_shift_start(&logs), Some(3));
    }

    #[test]
    fn double_in_leaves_earliest_dangling() {
        // Sequential consumption: the second `in` is adjacent to the
        // `out`, so that is the pair; the first `in` dangles.
        let logs = vec![
            log(1, LogType::In),
            log(2, LogType::In),
            log(3, LogType::Out),
        ];
        let pairs = pair_logs(&logs);
        assert_eq!(
            pairs,
            vec![AttendancePair {
                clock_in: 2,
                clock_out: 3
            }]
        );
    }

    #[test]
    fn pairs_are_most_recent_first() {
        let logs = vec![
            log(1, LogType::In),
            log(2, LogType::Out),
            log(3, LogType::In),
            log(4, LogType::Out),
        ];
        let pairs = pair_logs(&logs);
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0].clock_in, 3);
        assert_eq!(pairs[1].clock_in, 1);
    }

    #[test]
    fn unsorted_input_is_sorted_before_pairing() {
        let logs = vec![
            log(4, LogType::Out),
            log(1, LogType::In),
            log(3, LogType::In),
            log(2, LogType::Out),
        ];
        let pairs = pair_logs(&logs);
        assert_eq!(
            pairs,
            vec![
                AttendancePair {
                    clock_in: 3,
                    clock_out: 4
                },
                AttendancePair {
                    clock_in: 1,
                    clock_out: 2
                },
            ]
        );
    }

    #[test]
    fn lone_out_is_ignored() {
        let logs = vec![log(1, LogType::Out), log(2, LogType::In), log(3, LogType::Out)];
        let pairs = pair_logs(&logs);
        assert_eq!(
            pairs,
            vec![AttendancePair {
                clock_in: 2,
                clock_out: 3
            }]
        );
    }
}
