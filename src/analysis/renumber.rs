use crate::store::{Point, Role, Traverse};

/// Returns a copy of `traverse` with change points labeled `W1, W2, ...` and
/// mid-sights `M1, M2, ...` in traversal order.
///
/// Endpoints and unclassified points keep their labels. Identities are not
/// touched, so corrections stay attached to the same points.
pub fn renumber(traverse: &Traverse) -> Traverse {
    let mut out = traverse.clone();
    relabel(out.points_mut());
    out
}

pub(crate) fn relabel(points: &mut [Point]) {
    let mut change_points = 0;
    let mut mid_sights = 0;

    for point in points.iter_mut() {
        let counter = match point.role {
            Some(Role::ChangePoint) => &mut change_points,
            Some(Role::MidSight) => &mut mid_sights,
            _ => continue,
        };
        *counter += 1;
        if let Some(role) = point.role {
            point.label = format!("{}{}", role.label_prefix(), counter);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::PointId;
    use proptest::prelude::*;

    fn scrambled() -> Traverse {
        let roles = [
            ("MB7", Some(Role::Endpoint)),
            ("W9", Some(Role::ChangePoint)),
            ("M4", Some(Role::MidSight)),
            ("X1", None),
            ("M1", Some(Role::MidSight)),
            ("W2", Some(Role::ChangePoint)),
            ("MB8", Some(Role::Endpoint)),
        ];
        let points = roles
            .iter()
            .enumerate()
            .map(|(i, (label, role))| Point::new(PointId(10 + i as u32), *label, *role))
            .collect();
        Traverse::from_points(points, 1.0)
    }

    #[test]
    fn test_sequential_labels() {
        let t = renumber(&scrambled());
        let labels: Vec<&str> = t.points().iter().map(|p| p.label.as_str()).collect();
        assert_eq!(labels, vec!["MB7", "W1", "M1", "X1", "M2", "W2", "MB8"]);
    }

    #[test]
    fn test_identity_and_input_preserved() {
        let original = scrambled();
        let t = renumber(&original);
        let ids: Vec<PointId> = t.points().iter().map(|p| p.id).collect();
        let before: Vec<PointId> = original.points().iter().map(|p| p.id).collect();
        assert_eq!(ids, before);
        assert_eq!(original.points()[1].label, "W9");
    }

    #[test]
    fn test_idempotent() {
        let once = renumber(&scrambled());
        assert_eq!(renumber(&once), once);
    }

    fn any_role() -> impl Strategy<Value = Option<Role>> {
        prop_oneof![
            Just(Some(Role::ChangePoint)),
            Just(Some(Role::MidSight)),
            Just(Some(Role::Endpoint)),
            Just(None),
        ]
    }

    proptest! {
        #[test]
        fn prop_renumber_idempotent(roles in prop::collection::vec(any_role(), 0..20)) {
            let points = roles
                .iter()
                .enumerate()
                .map(|(i, role)| Point::new(PointId(i as u32), format!("Z{}", i), *role))
                .collect();
            let t = Traverse::from_points(points, 1.0);
            let once = renumber(&t);
            prop_assert_eq!(renumber(&once), once);
        }
    }
}
