//! Final presentation order for differences.

use super::difference::Difference;

/// Sorts differences for presentation: grouped by document, shallower
/// paths first. The sort is stable, so differences of equal depth keep
/// the comparator's emission order, which follows the position the
/// corresponding keys occupy in the source documents.
pub fn order_differences(diffs: &mut [Difference]) {
    diffs.sort_by_key(|d| (d.document_index, d.path.len()));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compare::difference::DiffKind;
    use crate::node::Node;
    use crate::path::PathElement;

    fn diff_at(segments: &[&str], document_index: usize) -> Difference {
        let path = segments.iter().map(|s| PathElement::field(*s)).collect();
        Difference {
            path,
            kind: DiffKind::Modified,
            from: Some(Node::Int(1)),
            to: Some(Node::Int(2)),
            document_index,
        }
    }

    #[test]
    fn test_shallow_paths_come_first() {
        let mut diffs = vec![
            diff_at(&["spec", "replicas"], 0),
            diff_at(&["kind"], 0),
            diff_at(&["spec", "template", "spec"], 0),
        ];
        order_differences(&mut diffs);

        let depths: Vec<usize> = diffs.iter().map(|d| d.path.len()).collect();
        assert_eq!(depths, vec![1, 2, 3]);
    }

    #[test]
    fn test_documents_stay_grouped() {
        let mut diffs = vec![
            diff_at(&["deep", "path", "here"], 0),
            diff_at(&["top"], 1),
            diff_at(&["mid", "way"], 0),
        ];
        order_differences(&mut diffs);

        let indices: Vec<usize> = diffs.iter().map(|d| d.document_index).collect();
        assert_eq!(indices, vec![0, 0, 1]);
    }

    #[test]
    fn test_equal_depth_keeps_emission_order() {
        let mut diffs = vec![
            diff_at(&["first"], 0),
            diff_at(&["second"], 0),
            diff_at(&["third"], 0),
        ];
        order_differences(&mut diffs);

        let names: Vec<String> = diffs.iter().map(|d| d.path.to_string()).collect();
        assert_eq!(names, vec!["first", "second", "third"]);
    }
}
