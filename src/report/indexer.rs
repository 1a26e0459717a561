//! 归档索引生成
//!
//! 扫描输出根目录下YYYY/MM/DD结构的历史报告目录，按日期倒序
//! 渲染一张导航页到根目录的index.html。仅在部署模式下执行。

use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate};
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

use super::escape_html;

/// 一期历史报告
#[derive(Debug, Clone, PartialEq)]
pub struct ReportEntry {
    pub date: NaiveDate,
    /// 相对输出根目录的报告路径
    pub path: String,
}

/// 扫描根目录下的历史报告，按日期倒序返回
pub fn scan_reports(root: &Path) -> Vec<ReportEntry> {
    let mut entries = Vec::new();

    for entry in WalkDir::new(root)
        .min_depth(3)
        .max_depth(3)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        if !entry.file_type().is_dir() {
            continue;
        }
        if !entry.path().join("index.html").exists() {
            continue;
        }

        let Ok(rel) = entry.path().strip_prefix(root) else {
            continue;
        };
        let parts: Vec<String> = rel
            .components()
            .map(|c| c.as_os_str().to_string_lossy().to_string())
            .collect();
        let [year, month, day] = parts.as_slice() else {
            continue;
        };

        let (Ok(y), Ok(m), Ok(d)) = (year.parse(), month.parse(), day.parse()) else {
            continue;
        };
        let Some(date) = NaiveDate::from_ymd_opt(y, m, d) else {
            continue;
        };

        entries.push(ReportEntry {
            date,
            path: format!("{}/{}/{}/index.html", year, month, day),
        });
    }

    entries.sort_by(|a, b| b.date.cmp(&a.date));
    entries
}

/// 重建归档索引页
pub fn generate_index(root: &Path) -> Result<()> {
    let reports = scan_reports(root);
    let html = render_index(&reports);

    let index_path = root.join("index.html");
    fs::write(&index_path, html).context(format!("索引写入失败: {:?}", index_path))?;
    println!("💾 已更新归档索引: {}（{} 期报告）", index_path.display(), reports.len());
    Ok(())
}

fn render_index(reports: &[ReportEntry]) -> String {
    let mut sections = String::new();
    let mut current_year: Option<i32> = None;

    for report in reports {
        let year = report.date.year();
        if current_year != Some(year) {
            if current_year.is_some() {
                sections.push_str("      </ul>\n    </section>\n");
            }
            sections.push_str(&format!(
                "    <section class=\"year-section\">\n      <h2>{}</h2>\n      <ul class=\"report-list\">\n",
                year
            ));
            current_year = Some(year);
        }
        sections.push_str(&format!(
            "        <li><a href=\"{}\">{} 期报告</a></li>\n",
            escape_html(&report.path),
            report.date
        ));
    }
    if current_year.is_some() {
        sections.push_str("      </ul>\n    </section>\n");
    }

    format!(
        r#"<!DOCTYPE html>
<html lang="zh-CN">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>arXiv 学术进展报告 - 历史归档</title>
  <style>
    body {{ font-family: -apple-system, "PingFang SC", "Microsoft YaHei", sans-serif;
           margin: 0; background: #f5f6fa; color: #2d3436; }}
    .container {{ max-width: 720px; margin: 0 auto; padding: 24px 16px; }}
    header {{ text-align: center; margin-bottom: 32px; }}
    .year-section h2 {{ border-left: 4px solid #0984e3; padding-left: 10px; }}
    .report-list {{ list-style: none; padding: 0; }}
    .report-list li {{ background: #fff; border-radius: 8px; margin: 8px 0;
                       box-shadow: 0 1px 3px rgba(0,0,0,0.08); }}
    .report-list a {{ display: block; padding: 12px 16px; color: #2d3436;
                      text-decoration: none; }}
    .report-list a:hover {{ color: #0984e3; }}
  </style>
</head>
<body>
  <div class="container">
    <header>
      <h1>arXiv 学术进展报告</h1>
      <div>历史归档（共 {count} 期）</div>
    </header>
{sections}  </div>
</body>
</html>
"#,
        count = reports.len(),
        sections = sections,
    )
}
