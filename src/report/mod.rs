//! 静态HTML报告渲染
//!
//! 把分桶后的论文渲染为单文件自包含的HTML页面：头部展示日期窗口
//! 与总数统计，正文按主题分章（配置的主题顺序在前，其余标签与
//! 兜底标签殿后），每篇论文一张卡片。

use anyhow::{Context, Result};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::config::Config;
use crate::types::{CategorizedBundle, Paper};

pub mod indexer;

/// 渲染报告到run_dir/index.html
pub fn render(config: &Config, bundle: &CategorizedBundle, run_dir: &Path) -> Result<()> {
    let html = render_html(config, bundle);
    let path = run_dir.join("index.html");
    fs::write(&path, html).context(format!("报告写入失败: {:?}", path))?;
    println!("💾 已保存报告: {}", path.display());
    Ok(())
}

/// 报告分章顺序：配置的主题在前，其余标签按字典序殿后
fn section_order(config: &Config, bundle: &CategorizedBundle) -> Vec<String> {
    let mut order: Vec<String> = config
        .topics
        .iter()
        .filter(|t| bundle.categories.contains_key(*t))
        .cloned()
        .collect();

    let configured: HashSet<&String> = config.topics.iter().collect();
    for topic in bundle.categories.keys() {
        if !configured.contains(topic) {
            order.push(topic.clone());
        }
    }
    order
}

fn render_html(config: &Config, bundle: &CategorizedBundle) -> String {
    let total: usize = {
        let mut ids = HashSet::new();
        for papers in bundle.categories.values() {
            for p in papers {
                ids.insert(p.arxiv_id.as_str());
            }
        }
        ids.len()
    };

    let mut sections = String::new();
    for topic in section_order(config, bundle) {
        let papers = &bundle.categories[&topic];
        sections.push_str(&format!(
            r#"    <section class="topic-section">
      <h2 class="section-title">{} - {}篇</h2>
      <div class="papers">
"#,
            escape_html(&topic),
            papers.len()
        ));
        for paper in papers {
            sections.push_str(&render_card(paper));
        }
        sections.push_str("      </div>\n    </section>\n");
    }

    format!(
        r#"<!DOCTYPE html>
<html lang="zh-CN">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>arXiv 学术进展报告 {date_range}</title>
  <style>
    body {{ font-family: -apple-system, "PingFang SC", "Microsoft YaHei", sans-serif;
           margin: 0; background: #f5f6fa; color: #2d3436; }}
    .container {{ max-width: 960px; margin: 0 auto; padding: 24px 16px; }}
    header {{ text-align: center; margin-bottom: 32px; }}
    header h1 {{ margin-bottom: 4px; }}
    .date-range {{ color: #636e72; }}
    .stats {{ display: flex; justify-content: center; gap: 24px; margin-top: 16px; }}
    .stat-box {{ background: #fff; border-radius: 8px; padding: 12px 24px;
                 box-shadow: 0 1px 3px rgba(0,0,0,0.08); }}
    .stat-number {{ font-size: 28px; font-weight: 700; color: #0984e3; }}
    .stat-label {{ font-size: 13px; color: #636e72; }}
    .section-title {{ border-left: 4px solid #0984e3; padding-left: 10px; margin-top: 40px; }}
    .card {{ background: #fff; border-radius: 8px; padding: 16px 20px; margin: 16px 0;
             box-shadow: 0 1px 3px rgba(0,0,0,0.08); }}
    .card-title {{ font-size: 17px; font-weight: 600; }}
    .card-title a {{ color: #2d3436; text-decoration: none; }}
    .card-title a:hover {{ color: #0984e3; }}
    .meta {{ font-size: 13px; color: #636e72; margin: 8px 0; }}
    .field-label {{ font-size: 13px; font-weight: 600; color: #0984e3; margin-top: 10px; }}
    .field-text {{ font-size: 14px; line-height: 1.6; }}
    .abstract {{ font-size: 13px; color: #636e72; line-height: 1.6; }}
  </style>
</head>
<body>
  <div class="container">
    <header>
      <h1>arXiv 学术进展报告</h1>
      <div class="date-range">{date_range}</div>
      <div class="stats">
        <div class="stat-box">
          <div class="stat-number">{total}</div>
          <div class="stat-label">论文总数</div>
        </div>
        <div class="stat-box">
          <div class="stat-number">{topic_count}</div>
          <div class="stat-label">主题分类</div>
        </div>
      </div>
    </header>
{sections}  </div>
</body>
</html>
"#,
        date_range = bundle.date_range,
        total = total,
        topic_count = bundle.categories.len(),
        sections = sections,
    )
}

fn render_card(paper: &Paper) -> String {
    let authors = format_authors(&paper.authors);

    let mut body = String::new();
    if let Some(summary) = &paper.summary {
        body.push_str(&format!(
            "        <div class=\"field-label\">📋 研究总结</div>\n        <div class=\"field-text\">{}</div>\n",
            escape_html(summary)
        ));
    }
    if let Some(keywords) = &paper.keywords {
        body.push_str(&format!(
            "        <div class=\"field-label\">🔑 关键词</div>\n        <div class=\"field-text\">{}</div>\n",
            escape_html(keywords)
        ));
    }
    if let Some(abstract_cn) = &paper.abstract_cn {
        body.push_str(&format!(
            "        <div class=\"field-label\">📖 摘要（中文）</div>\n        <div class=\"abstract\">{}</div>\n",
            escape_html(abstract_cn)
        ));
    }
    if !paper.abstract_text.is_empty() {
        body.push_str(&format!(
            "        <div class=\"field-label\">📄 Abstract</div>\n        <div class=\"abstract\">{}</div>\n",
            escape_html(&paper.abstract_text)
        ));
    }

    format!(
        r#"      <div class="card">
        <div class="card-title"><a href="{pdf_url}" target="_blank">{title}</a></div>
        <div class="meta">{arxiv_id} · {published} · {category} · {authors}</div>
{body}      </div>
"#,
        pdf_url = escape_html(&paper.pdf_url),
        title = escape_html(&paper.title),
        arxiv_id = escape_html(&paper.arxiv_id),
        published = paper.published,
        category = escape_html(&paper.primary_category),
        authors = escape_html(&authors),
        body = body,
    )
}

/// 作者过多时截断展示
fn format_authors(authors: &[String]) -> String {
    const MAX_SHOWN: usize = 6;
    if authors.len() <= MAX_SHOWN {
        authors.join(", ")
    } else {
        format!("{} 等{}人", authors[..MAX_SHOWN].join(", "), authors.len())
    }
}

/// HTML转义所有插值文本
fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CategorizedBundle, DateRange};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn sample_bundle() -> CategorizedBundle {
        let range = DateRange::ending_at(NaiveDate::from_ymd_opt(2025, 1, 10).unwrap(), 7);
        let mut bundle = CategorizedBundle::new(range);
        bundle.categories.insert(
            "医疗大模型".to_string(),
            vec![Paper {
                arxiv_id: "2501.00001v1".to_string(),
                title: "A <Medical> LLM & Friends".to_string(),
                authors: vec!["Alice".to_string(), "Bob".to_string()],
                published: NaiveDate::from_ymd_opt(2025, 1, 5).unwrap(),
                abstract_text: "An abstract.".to_string(),
                pdf_url: "https://arxiv.org/pdf/2501.00001v1".to_string(),
                primary_category: "cs.CL".to_string(),
                topics: vec!["医疗大模型".to_string()],
                keywords: Some("LLM, 医疗".to_string()),
                summary: Some("总结".to_string()),
                abstract_cn: Some("中文摘要".to_string()),
            }],
        );
        bundle
    }

    #[test]
    fn test_render_writes_index_html() {
        let dir = TempDir::new().unwrap();
        let config = Config::default();
        render(&config, &sample_bundle(), dir.path()).unwrap();

        let html = std::fs::read_to_string(dir.path().join("index.html")).unwrap();
        assert!(html.contains("医疗大模型"));
        assert!(html.contains("2501.00001v1"));
        // 标题中的特殊字符被转义
        assert!(html.contains("A &lt;Medical&gt; LLM &amp; Friends"));
        assert!(!html.contains("A <Medical>"));
    }

    #[test]
    fn test_section_order_configured_topics_first() {
        let mut config = Config::default();
        config.topics = vec!["医疗大模型".to_string(), "医疗智能体".to_string()];

        let mut bundle = sample_bundle();
        bundle.categories.insert("Other".to_string(), vec![]);
        bundle.categories.insert("医疗智能体".to_string(), vec![]);

        let order = section_order(&config, &bundle);
        assert_eq!(order, vec!["医疗大模型", "医疗智能体", "Other"]);
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<a href="x">&'"#),
            "&lt;a href=&quot;x&quot;&gt;&amp;&#x27;"
        );
    }

    #[test]
    fn test_format_authors_truncates() {
        let authors: Vec<String> = (1..=8).map(|i| format!("A{}", i)).collect();
        let shown = format_authors(&authors);
        assert!(shown.contains("等8人"));
        assert!(!shown.contains("A7"));

        let few = vec!["X".to_string(), "Y".to_string()];
        assert_eq!(format_authors(&few), "X, Y");
    }
}
