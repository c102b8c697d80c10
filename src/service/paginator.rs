//! 打印分页：按估算空间贪心装页，单次遍历，不回溯

use crate::models::{Page, PageBudget, PricedLine, QuoteLine};

/// 正在填充的页
#[derive(Debug, Default)]
struct PendingPage {
    title: Option<String>,
    items: Vec<PricedLine>,
    space_used: u32,
}

impl PendingPage {
    fn has_content(&self) -> bool {
        !self.items.is_empty() || self.title.is_some()
    }

    fn close(&mut self, pages: &mut Vec<Page>) {
        let page = std::mem::take(self);
        pages.push(Page {
            number: pages.len() + 1,
            title: page.title,
            items: page.items,
            is_header: false,
            is_terminal: false,
        });
    }
}

/// 将报价行切分为打印页
///
/// 必须传入完整、有序的报价行列表；首页空间扣减依赖本次调用内的页计数。
pub fn paginate(lines: &[QuoteLine], budget: &PageBudget, first_page_constrained: bool) -> Vec<Page> {
    let mut pages: Vec<Page> = Vec::new();
    let mut current = PendingPage::default();

    for line in lines {
        match line {
            QuoteLine::Separator(sep) => {
                // 分节标题总是另起一页，标题本身不占空间
                if current.has_content() {
                    current.close(&mut pages);
                }
                current.title = Some(sep.label.clone());
                current.space_used = 0;
            }
            QuoteLine::Priced(item) => {
                let header_page = first_page_constrained && pages.is_empty();
                let limit = budget.limit(header_page);
                let cost = budget.cost_of(item);

                if current.space_used + cost > limit && current.has_content() {
                    tracing::debug!(
                        "page {} full ({}/{}), breaking before {}",
                        pages.len() + 1,
                        current.space_used,
                        limit,
                        item.id
                    );
                    // 自动换页：新页不继承标题
                    current.close(&mut pages);
                }

                current.items.push(item.clone());
                current.space_used += cost;
            }
        }
    }

    if current.has_content() || pages.is_empty() {
        current.close(&mut pages);
    }

    if let Some(first) = pages.first_mut() {
        first.is_header = true;
    }
    if let Some(last) = pages.last_mut() {
        last.is_terminal = true;
    }

    pages
}
