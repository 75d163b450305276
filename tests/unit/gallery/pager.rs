use super::*;

#[test]
fn twenty_items_in_pages_of_eight() {
    let mut p = Pager::new(20, PAGE_SIZE);
    assert_eq!(p.next_range(), 0..8);
    assert_eq!(p.load_more().label, LOAD_MORE_LABEL);
    assert_eq!(p.next_range(), 8..16);
    assert!(p.load_more().enabled);
    assert_eq!(p.next_range(), 16..20);
    assert!(p.is_exhausted());
    assert_eq!(
        p.load_more(),
        LoadMore {
            enabled: false,
            label: ALL_LOADED_LABEL
        }
    );
    assert_eq!(p.next_range(), 20..20);
    assert_eq!(p.cursor(), 20);
}

#[test]
fn exact_multiple_and_empty() {
    let mut p = Pager::new(8, PAGE_SIZE);
    assert_eq!(p.next_range(), 0..8);
    assert!(p.is_exhausted());

    let mut p = Pager::new(0, PAGE_SIZE);
    assert!(p.is_exhausted());
    assert_eq!(p.next_range(), 0..0);
}

#[test]
fn zero_page_size_still_advances() {
    let mut p = Pager::new(2, 0);
    assert_eq!(p.next_range(), 0..1);
    assert_eq!(p.total(), 2);
}
