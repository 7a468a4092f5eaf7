// Fixed-size pagination over an ordered sequence

/// One page of a sequence
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 1-based page number after clamping
    pub number: usize,
    pub total_pages: usize,
    pub total_items: usize,
}

impl<T> Page<T> {
    pub fn has_prev(&self) -> bool {
        self.number > 1
    }

    pub fn has_next(&self) -> bool {
        self.number < self.total_pages
    }
}

/// Number of pages for `count` items, never less than 1
///
/// A page size of 0 is treated as 1.
pub fn total_pages(count: usize, page_size: usize) -> usize {
    count.div_ceil(page_size.max(1)).max(1)
}

/// Slice out page `page_number`, clamped into `[1, total_pages]`
pub fn paginate<T>(items: Vec<T>, page_size: usize, page_number: usize) -> Page<T> {
    let page_size = page_size.max(1);
    let total_items = items.len();
    let total = total_pages(total_items, page_size);
    let number = page_number.clamp(1, total);

    let items = items
        .into_iter()
        .skip((number - 1) * page_size)
        .take(page_size)
        .collect();

    Page {
        items,
        number,
        total_pages: total,
        total_items,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_pages() {
        assert_eq!(total_pages(0, 6), 1);
        assert_eq!(total_pages(6, 6), 1);
        assert_eq!(total_pages(7, 6), 2);
        assert_eq!(total_pages(13, 6), 3);
        assert_eq!(total_pages(3, 0), 3);
    }

    #[test]
    fn test_last_partial_page() {
        let items: Vec<u32> = (0..13).collect();
        let page = paginate(items, 6, 3);
        assert_eq!(page.items, vec![12]);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.number, 3);
        assert!(page.has_prev());
        assert!(!page.has_next());
    }

    #[test]
    fn test_out_of_range_clamps_to_boundary() {
        let items: Vec<u32> = (0..13).collect();
        assert_eq!(paginate(items.clone(), 6, 99), paginate(items.clone(), 6, 3));
        assert_eq!(paginate(items.clone(), 6, 0), paginate(items, 6, 1));
    }

    #[test]
    fn test_empty_sequence() {
        let page = paginate(Vec::<u32>::new(), 6, 4);
        assert!(page.items.is_empty());
        assert_eq!(page.number, 1);
        assert_eq!(page.total_pages, 1);
        assert!(!page.has_prev());
        assert!(!page.has_next());
    }

    #[test]
    fn test_first_page() {
        let items: Vec<u32> = (0..13).collect();
        let page = paginate(items, 6, 1);
        assert_eq!(page.items, vec![0, 1, 2, 3, 4, 5]);
        assert!(page.has_next());
    }
}
