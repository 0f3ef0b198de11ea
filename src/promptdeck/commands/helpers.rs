use super::Direction;

/// Swap an item with its adjacent same-category sibling, in place.
///
/// The local position is computed by filtering the full ordered collection
/// down to same-category siblings; the swap itself happens on the
/// full-collection indices, so unrelated categories keep their interleaved
/// order. Returns `false` (leaving the slice untouched) for a missing id or
/// a boundary move.
pub(crate) fn swap_with_sibling<T>(
    items: &mut [T],
    category_of: impl Fn(&T) -> &str,
    id_of: impl Fn(&T) -> &str,
    id: &str,
    direction: Direction,
) -> bool {
    let full_index = match items.iter().position(|item| id_of(item) == id) {
        Some(index) => index,
        None => return false,
    };
    let category = category_of(&items[full_index]).to_string();

    let siblings: Vec<usize> = items
        .iter()
        .enumerate()
        .filter(|(_, item)| category_of(item) == category)
        .map(|(index, _)| index)
        .collect();
    let local = match siblings.iter().position(|&index| index == full_index) {
        Some(local) => local,
        None => return false,
    };

    let neighbor = match direction {
        Direction::Up => {
            if local == 0 {
                return false;
            }
            siblings[local - 1]
        }
        Direction::Down => {
            if local + 1 >= siblings.len() {
                return false;
            }
            siblings[local + 1]
        }
    };

    items.swap(full_index, neighbor);
    true
}
