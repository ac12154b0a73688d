//! Size ranking shared by the constructors.

use crate::wave::Units;

/// Returns indices sorted by descending size.
///
/// Equal sizes keep ascending index order, so the ranking is deterministic.
///
/// # Examples
///
/// ```
/// use u_wavepick::greedy::rank_descending;
///
/// assert_eq!(rank_descending(&[3, 7, 3, 9]), vec![3, 1, 0, 2]);
/// ```
pub fn rank_descending(sizes: &[Units]) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..sizes.len()).collect();
    // Stable sort: ties stay in index order.
    indices.sort_by(|&a, &b| sizes[b].cmp(&sizes[a]));
    indices
}
