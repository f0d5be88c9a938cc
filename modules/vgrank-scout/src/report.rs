use std::fmt::Write;

use chrono::Local;

use vgrank_common::SiteRanking;

use crate::stats::RankingStats;

/// Products shown per site before collapsing into a "N more" line.
const PRODUCTS_PER_SITE: usize = 3;

pub fn rank_marker(rank: usize) -> String {
    match rank {
        1 => "🥇".to_string(),
        2 => "🥈".to_string(),
        3 => "🥉".to_string(),
        n => format!("{n}位"),
    }
}

/// `1234567` → `"1,234,567"`.
pub fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

pub fn format_price(price: u64) -> String {
    if price > 0 {
        format!("¥{}", group_thousands(price))
    } else {
        "価格未設定".to_string()
    }
}

/// Text rendering of a ranking snapshot, in the order given.
pub fn render_ranking(rankings: &[SiteRanking], search_query: Option<&str>) -> String {
    let mut out = String::new();

    if rankings.is_empty() {
        match search_query {
            Some(q) => {
                let _ = writeln!(out, "「{q}」の検索結果が見つかりませんでした。");
            }
            None => {
                let _ = writeln!(out, "検索を実行してください。");
            }
        }
        return out;
    }

    let _ = writeln!(out, "VG流通量ランキング");
    if let Some(q) = search_query {
        let _ = writeln!(out, "検索キーワード: 「{q}」");
    }

    for (i, site) in rankings.iter().enumerate() {
        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "{} {}  {}件の商品が見つかりました  ({})",
            rank_marker(i + 1),
            site.site,
            site.product_count,
            site.last_updated
                .with_timezone(&Local)
                .format("%Y/%m/%d %H:%M:%S")
        );
        for product in site.products.iter().take(PRODUCTS_PER_SITE) {
            let stock = if product.availability { "在庫あり" } else { "在庫なし" };
            let _ = writeln!(
                out,
                "    - {}  {}  [{}]  {}",
                product.title,
                format_price(product.price),
                stock,
                product.product_url
            );
        }
        if site.products.len() > PRODUCTS_PER_SITE {
            let _ = writeln!(
                out,
                "    他 {} 件の商品があります",
                site.products.len() - PRODUCTS_PER_SITE
            );
        }
    }
    out
}

pub fn render_stats(stats: &RankingStats) -> String {
    let mut out = String::new();
    if stats.site_count == 0 {
        return out;
    }

    let _ = writeln!(out, "統計情報");
    let _ = writeln!(out, "  総商品数: {}", stats.total_products);
    let _ = writeln!(out, "  検索サイト数: {}", stats.site_count);
    let _ = writeln!(
        out,
        "  平均価格: ¥{}",
        group_thousands(stats.average_price.round() as u64)
    );
    let _ = writeln!(out, "  在庫率: {:.1}%", stats.availability_rate);

    let _ = writeln!(out, "サイト別商品数");
    for share in &stats.sites {
        let _ = writeln!(
            out,
            "  {}  {}件 ({:.1}%)  {}",
            share.site,
            share.product_count,
            share.share_of_total,
            bar(share.share_of_max)
        );
    }

    if !stats.price_summaries.is_empty() {
        let _ = writeln!(out, "価格分布");
        for summary in &stats.price_summaries {
            let _ = writeln!(
                out,
                "  {}  最安値 ¥{} / 平均値 ¥{} / 最高値 ¥{}",
                summary.site,
                group_thousands(summary.min),
                group_thousands(summary.average.round() as u64),
                group_thousands(summary.max)
            );
        }
    }
    out
}

fn bar(percent: f64) -> String {
    let width = (percent / 5.0).round().clamp(0.0, 20.0) as usize;
    "█".repeat(width)
}
