use crate::geometry::Point;

/// One axis of pointer travel between two successive move events.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
    Unknown,
}

/// Classifies the travel from `previous` to `current` into a
/// (horizontal, vertical) pair.
///
/// With no previous point (first move of a session) both axes are `Unknown`.
/// Once both points exist a zero delta classifies as `Right`/`Down`, never
/// `Unknown`; the insertion side during a reorder hangs off that tie-break.
pub fn drag_direction(previous: Option<Point>, current: Point) -> (Direction, Direction) {
    let Some(previous) = previous else {
        return (Direction::Unknown, Direction::Unknown);
    };
    let horizontal = if previous.x - current.x > 0.0 {
        Direction::Left
    } else {
        Direction::Right
    };
    let vertical = if previous.y - current.y > 0.0 {
        Direction::Up
    } else {
        Direction::Down
    };
    (horizontal, vertical)
}
