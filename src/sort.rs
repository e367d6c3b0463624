//! Sorting of the point-id permutation by a parallel key array.

/// Sorts `ids[left..=right]` so that `dists[ids[k]]` is ascending. The key array is never
/// permuted.
///
/// Small spans use insertion sort; larger spans a median-of-three quicksort. Equal keys keep an
/// unspecified relative order.
pub(crate) fn quicksort(ids: &mut [usize], dists: &[f64], left: usize, right: usize) {
    if right - left <= 20 {
        for i in (left + 1)..=right {
            let temp = ids[i];
            let temp_dist = dists[temp];
            let mut j = i;
            while j > left && dists[ids[j - 1]] > temp_dist {
                ids[j] = ids[j - 1];
                j -= 1;
            }
            ids[j] = temp;
        }
    } else {
        let median = (left + right) >> 1;
        let mut i = left + 1;
        let mut j = right;

        ids.swap(median, i);
        if dists[ids[left]] > dists[ids[right]] {
            ids.swap(left, right);
        }
        if dists[ids[i]] > dists[ids[right]] {
            ids.swap(i, right);
        }
        if dists[ids[left]] > dists[ids[i]] {
            ids.swap(left, i);
        }

        let temp = ids[i];
        let temp_dist = dists[temp];
        loop {
            loop {
                i += 1;
                if dists[ids[i]] >= temp_dist {
                    break;
                }
            }
            loop {
                j -= 1;
                if dists[ids[j]] <= temp_dist {
                    break;
                }
            }
            if j < i {
                break;
            }
            ids.swap(i, j);
        }
        ids[left + 1] = ids[j];
        ids[j] = temp;

        // recurse into the smaller partition last to bound the stack depth
        if right - i + 1 >= j - left {
            quicksort(ids, dists, i, right);
            quicksort(ids, dists, left, j - 1);
        } else {
            quicksort(ids, dists, left, j - 1);
            quicksort(ids, dists, i, right);
        }
    }
}
