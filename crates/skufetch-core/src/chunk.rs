//! Fixed-size slicing of descriptor sequences into chunks, and of chunks into waves.

/// Split `items` into consecutive groups of `size` (the last may be shorter).
///
/// Order is preserved and nothing is dropped: concatenating the result gives
/// back `items`. A `size` of 0 is treated as 1.
pub fn chunk<T>(items: Vec<T>, size: usize) -> Vec<Vec<T>> {
    let size = size.max(1);
    let mut out = Vec::with_capacity(items.len().div_ceil(size));
    let mut current = Vec::with_capacity(size.min(items.len()));
    for item in items {
        current.push(item);
        if current.len() == size {
            out.push(std::mem::replace(&mut current, Vec::with_capacity(size)));
        }
    }
    if !current.is_empty() {
        out.push(current);
    }
    out
}

/// Group chunks into waves of `width` chunks processed concurrently.
pub fn wave<T>(chunks: Vec<Vec<T>>, width: usize) -> Vec<Vec<Vec<T>>> {
    chunk(chunks, width)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunk_exact_multiple() {
        let chunks = chunk((1..=6).collect::<Vec<_>>(), 3);
        assert_eq!(chunks, vec![vec![1, 2, 3], vec![4, 5, 6]]);
    }

    #[test]
    fn chunk_last_shorter() {
        let chunks = chunk((1..=7).collect::<Vec<_>>(), 3);
        assert_eq!(chunks, vec![vec![1, 2, 3], vec![4, 5, 6], vec![7]]);
    }

    #[test]
    fn chunk_is_total_and_order_preserving() {
        for n in [0usize, 1, 2, 9, 10, 11, 97] {
            for size in [1usize, 2, 5, 10, 100] {
                let items: Vec<usize> = (0..n).collect();
                let chunks = chunk(items.clone(), size);
                let (last, init) = match chunks.split_last() {
                    Some(parts) => parts,
                    None => {
                        assert_eq!(n, 0);
                        continue;
                    }
                };
                assert!(init.iter().all(|c| c.len() == size));
                assert!(!last.is_empty() && last.len() <= size);
                let flat: Vec<usize> = chunks.into_iter().flatten().collect();
                assert_eq!(flat, items);
            }
        }
    }

    #[test]
    fn chunk_empty_input() {
        assert!(chunk(Vec::<u8>::new(), 8000).is_empty());
    }

    #[test]
    fn chunk_zero_size_treated_as_one() {
        assert_eq!(chunk(vec!['a', 'b'], 0), vec![vec!['a'], vec!['b']]);
    }

    #[test]
    fn wave_groups_chunks() {
        let chunks = chunk((1..=5).collect::<Vec<_>>(), 1);
        let waves = wave(chunks, 2);
        assert_eq!(waves.len(), 3);
        assert_eq!(waves[0], vec![vec![1], vec![2]]);
        assert_eq!(waves[2], vec![vec![5]]);
    }
}
