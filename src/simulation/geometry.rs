//! Geometry for line-of-sight checks between nodes.
//!
//! Contains helpers for:
//! - Point-in-obstacle tests (rectangles, circles)
//! - Segment-obstacle intersection tests
//! - Segment-segment intersection with collinear handling
//! - Distance calculations (squared distance to avoid sqrt in range checks)

use super::types::{CirclePos, Obstacle, Point, RectPos};

/// Squared Euclidean distance in world units.
pub fn distance2(a: &Point, b: &Point) -> f64 {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    dx * dx + dy * dy
}

pub fn distance(a: &Point, b: &Point) -> f64 {
    distance2(a, b).sqrt()
}

/// Check whether the straight line between two nodes crosses any obstacle.
///
/// A degenerate segment (`from == to`) is treated as a point: it is blocked
/// only when the point lies inside an obstacle.
///
/// # Returns
///
/// `true` if line-of-sight is blocked, `false` if it is clear.
pub fn is_line_of_sight_blocked(from: &Point, to: &Point, obstacles: &[Obstacle]) -> bool {
    if from == to {
        return obstacles.iter().any(|obstacle| obstacle.contains(from));
    }
    obstacles.iter().any(|obstacle| obstacle.intersects_segment(from, to))
}

impl Obstacle {
    /// Inclusive point-inside-obstacle test.
    pub fn contains(&self, p: &Point) -> bool {
        match self {
            Obstacle::Rectangle { position } => point_in_rect(p, position),
            Obstacle::Circle { position } => point_in_circle(p, position),
        }
    }

    pub fn intersects_segment(&self, a: &Point, b: &Point) -> bool {
        match self {
            Obstacle::Rectangle { position } => segment_intersects_rect(a, b, position),
            Obstacle::Circle { position } => segment_intersects_circle(a, b, position),
        }
    }
}

/// Normalized (left, right, top, bottom) bounds of a rectangle.
fn rect_bounds(rect: &RectPos) -> (f64, f64, f64, f64) {
    (
        rect.top_left.x.min(rect.bottom_right.x),
        rect.top_left.x.max(rect.bottom_right.x),
        rect.top_left.y.min(rect.bottom_right.y),
        rect.top_left.y.max(rect.bottom_right.y),
    )
}

fn point_in_rect(p: &Point, rect: &RectPos) -> bool {
    let (left, right, top, bottom) = rect_bounds(rect);
    (left..=right).contains(&p.x) && (top..=bottom).contains(&p.y)
}

fn point_in_circle(p: &Point, circle: &CirclePos) -> bool {
    distance2(p, &circle.center) <= circle.radius * circle.radius
}

fn segment_intersects_rect(a: &Point, b: &Point, rect: &RectPos) -> bool {
    if point_in_rect(a, rect) || point_in_rect(b, rect) {
        return true;
    }

    let (left, right, top, bottom) = rect_bounds(rect);
    let corners = [
        Point { x: left, y: top },
        Point { x: right, y: top },
        Point { x: right, y: bottom },
        Point { x: left, y: bottom },
    ];
    (0..4).any(|i| segments_intersect(a, b, &corners[i], &corners[(i + 1) % 4]))
}

/// Closest point on the segment to the circle center, via the clamped projection parameter.
fn segment_intersects_circle(a: &Point, b: &Point, circle: &CirclePos) -> bool {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let length2 = dx * dx + dy * dy;
    if length2 == 0.0 {
        return point_in_circle(a, circle);
    }
    let t = (((circle.center.x - a.x) * dx + (circle.center.y - a.y) * dy) / length2).clamp(0.0, 1.0);
    let closest = Point {
        x: a.x + t * dx,
        y: a.y + t * dy,
    };
    point_in_circle(&closest, circle)
}

/// Orientation of ordered triplet (a, b, c): 1 clockwise, -1 counter-clockwise, 0 collinear.
fn orientation(a: &Point, b: &Point, c: &Point) -> i8 {
    let val = (b.y - a.y) * (c.x - b.x) - (b.x - a.x) * (c.y - b.y);
    if val > 0.0 {
        1
    } else if val < 0.0 {
        -1
    } else {
        0
    }
}

/// True if `b` lies within the bounding box of segment a–c (collinearity assumed).
fn on_segment(a: &Point, b: &Point, c: &Point) -> bool {
    b.x >= a.x.min(c.x) && b.x <= a.x.max(c.x) && b.y >= a.y.min(c.y) && b.y <= a.y.max(c.y)
}

/// Segment–segment intersection including endpoint touching and collinear overlap.
pub fn segments_intersect(p1: &Point, q1: &Point, p2: &Point, q2: &Point) -> bool {
    let o1 = orientation(p1, q1, p2);
    let o2 = orientation(p1, q1, q2);
    let o3 = orientation(p2, q2, p1);
    let o4 = orientation(p2, q2, q1);

    if o1 != o2 && o3 != o4 {
        return true;
    }
    (o1 == 0 && on_segment(p1, p2, q1)) || (o2 == 0 && on_segment(p1, q2, q1)) || (o3 == 0 && on_segment(p2, p1, q2)) || (o4 == 0 && on_segment(p2, q1, q2))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64) -> Point {
        Point { x, y }
    }

    fn rect(x1: f64, y1: f64, x2: f64, y2: f64) -> Obstacle {
        Obstacle::Rectangle {
            position: RectPos {
                top_left: p(x1, y1),
                bottom_right: p(x2, y2),
            },
        }
    }

    fn circle(x: f64, y: f64, radius: f64) -> Obstacle {
        Obstacle::Circle {
            position: CirclePos { center: p(x, y), radius },
        }
    }

    #[test]
    fn obstacle_contains_is_inclusive() {
        let r = rect(10.0, 10.0, 20.0, 20.0);
        assert!(r.contains(&p(10.0, 10.0)));
        assert!(r.contains(&p(15.0, 15.0)));
        assert!(r.contains(&p(20.0, 20.0)));
        assert!(!r.contains(&p(9.0, 10.0)));

        let c = circle(50.0, 50.0, 10.0);
        assert!(c.contains(&p(50.0, 50.0)));
        assert!(c.contains(&p(60.0, 50.0)));
        assert!(!c.contains(&p(61.0, 50.0)));
    }

    #[test]
    fn segments_intersect_basic_cases() {
        assert!(segments_intersect(&p(0.0, 0.0), &p(10.0, 10.0), &p(0.0, 10.0), &p(10.0, 0.0)));
        // Collinear overlap
        assert!(segments_intersect(&p(0.0, 0.0), &p(10.0, 0.0), &p(5.0, 0.0), &p(15.0, 0.0)));
        // Collinear but disjoint
        assert!(!segments_intersect(&p(0.0, 0.0), &p(1.0, 1.0), &p(2.0, 2.0), &p(3.0, 3.0)));
    }

    #[test]
    fn line_of_sight_blocked_by_rectangle_and_circle() {
        let wall = [rect(40.0, 0.0, 60.0, 100.0)];
        assert!(is_line_of_sight_blocked(&p(0.0, 50.0), &p(100.0, 50.0), &wall));
        assert!(!is_line_of_sight_blocked(&p(0.0, 150.0), &p(100.0, 150.0), &wall));

        let pillar = [circle(50.0, 50.0, 5.0)];
        assert!(is_line_of_sight_blocked(&p(0.0, 50.0), &p(100.0, 50.0), &pillar));
        assert!(!is_line_of_sight_blocked(&p(0.0, 60.0), &p(100.0, 60.0), &pillar));
        assert!(!is_line_of_sight_blocked(&p(0.0, 50.0), &p(100.0, 50.0), &[]));
    }

    #[test]
    fn degenerate_segment_is_a_point_test() {
        let obstacles = [rect(0.0, 0.0, 10.0, 10.0)];
        assert!(is_line_of_sight_blocked(&p(5.0, 5.0), &p(5.0, 5.0), &obstacles));
        assert!(!is_line_of_sight_blocked(&p(20.0, 20.0), &p(20.0, 20.0), &obstacles));
    }

    #[test]
    fn distance_is_euclidean() {
        assert_eq!(distance2(&p(0.0, 0.0), &p(3.0, 4.0)), 25.0);
        assert_eq!(distance(&p(0.0, 0.0), &p(3.0, 4.0)), 5.0);
    }
}
