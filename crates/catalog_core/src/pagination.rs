/// Number of link slots the pager always renders, so its width never changes.
pub const PAGE_LINK_SLOTS: u32 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageLink {
    Page { number: u32, active: bool },
    Ellipsis,
    /// Invisible placeholder for a slot beyond the last page.
    Blank { slot: u32 },
}

impl PageLink {
    fn page(number: u32, current: u32) -> Self {
        PageLink::Page {
            number,
            active: number == current,
        }
    }

    /// Target page when the slot is clickable.
    pub fn target(&self) -> Option<u32> {
        match self {
            PageLink::Page { number, .. } => Some(*number),
            PageLink::Ellipsis | PageLink::Blank { .. } => None,
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, PageLink::Page { active: true, .. })
    }
}

/// Maps the current page and page count to the seven pager slots.
///
/// Up to seven pages are listed in full and padded with blanks. Past that the
/// first and last pages are pinned, three pages around `page` fill the middle,
/// and the second and sixth slots collapse to an ellipsis when they would skip
/// pages.
pub fn page_links(page: u32, total_pages: u32) -> Vec<PageLink> {
    if total_pages <= PAGE_LINK_SLOTS {
        return (1..=PAGE_LINK_SLOTS)
            .map(|slot| {
                if slot <= total_pages {
                    PageLink::page(slot, page)
                } else {
                    PageLink::Blank { slot }
                }
            })
            .collect();
    }

    let mut links = Vec::with_capacity(PAGE_LINK_SLOTS as usize);
    links.push(PageLink::page(1, page));

    if page <= 4 {
        links.push(PageLink::page(2, page));
    } else {
        links.push(PageLink::Ellipsis);
    }

    let middle_start = if page <= 3 {
        3
    } else if page >= total_pages - 2 {
        total_pages - 4
    } else {
        page - 1
    };
    links.extend((middle_start..middle_start + 3).map(|number| PageLink::page(number, page)));

    if page >= total_pages - 3 {
        links.push(PageLink::page(total_pages - 1, page));
    } else {
        links.push(PageLink::Ellipsis);
    }

    links.push(PageLink::page(total_pages, page));
    links
}
