// 分页工具

/// 每页题目数
pub const QUESTIONS_PER_PAGE: usize = 10;

/// 解析页码，缺省或非数字时为第 1 页
pub fn parse_page(raw: Option<&str>) -> i64 {
    raw.and_then(|s| s.trim().parse::<i64>().ok()).unwrap_or(1)
}

/// 取第 `page` 页（从 1 开始），越界返回空切片
pub fn paginate<T>(items: &[T], page: i64, size: usize) -> &[T] {
    if page < 1 || size == 0 {
        return &[];
    }

    let start = match usize::try_from(page - 1)
        .ok()
        .and_then(|p| p.checked_mul(size))
    {
        Some(start) if start < items.len() => start,
        _ => return &[],
    };
    let end = start.saturating_add(size).min(items.len());

    &items[start..end]
}
