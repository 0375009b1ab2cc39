// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use bookscout::domain::models::search_result::UNKNOWN_AUTHOR;
use bookscout::infrastructure::catalog::extractor::CatalogExtractor;
use url::Url;

use crate::integration::helpers::{DETAIL_PAGE, SANTI_SEARCH_PAGE};

const PROXY: &str = "https://images.weserv.nl/?url={url}";

fn extractor(max_results: usize) -> CatalogExtractor {
    CatalogExtractor::new(
        Url::parse("https://catalog.example.com").unwrap(),
        PROXY,
        max_results,
    )
}

#[test]
fn test_search_rows_are_extracted_in_order() {
    let results = extractor(20).extract_search_results(SANTI_SEARCH_PAGE);

    assert_eq!(results.len(), 2);

    let first = &results[0];
    assert_eq!(first.title, "三体");
    assert_eq!(first.author, "刘慈欣");
    assert_eq!(first.category, "科幻");
    assert_eq!(first.word_count, 888_000);
    assert_eq!(first.source_url, "https://catalog.example.com/book/1.html");
    assert_eq!(first.description, "地球文明向宇宙发出的第一声啼鸣");
    assert_eq!(
        first.cover_url,
        "https://images.weserv.nl/?url=https%3A%2F%2Fcatalog.example.com%2Fcover%2F1.jpg"
    );

    let second = &results[1];
    assert_eq!(second.title, "三体前传");
    assert_eq!(second.author, UNKNOWN_AUTHOR);
    assert_eq!(second.category, "同人");
    assert_eq!(second.word_count, 12_345);
    assert_eq!(second.source_url, "https://m.catalog.example.com/book/2.html");
    assert_eq!(second.cover_url, "");
    assert!(second.platform.is_none());
}

#[test]
fn test_row_without_title_is_skipped() {
    let html = r#"<html><body>
      <div class="bookbox"><div class="bookinfo"><h4 class="bookname"><a href="/book/1.html">球状闪电</a></h4></div></div>
      <div class="bookbox"><div class="bookinfo"><div class="author">作者：无名</div></div></div>
      <div class="bookbox"><div class="bookinfo"><h4 class="bookname"><a href="/book/3.html">超新星纪元</a></h4></div></div>
    </body></html>"#;

    let results = extractor(20).extract_search_results(html);

    let titles: Vec<_> = results.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(titles, vec!["球状闪电", "超新星纪元"]);
}

#[test]
fn test_results_are_capped() {
    let rows: String = (0..5)
        .map(|i| {
            format!(
                r#"<div class="bookbox"><h4 class="bookname"><a href="/book/{i}.html">书{i}</a></h4></div>"#
            )
        })
        .collect();
    let html = format!("<html><body>{}</body></html>", rows);

    let results = extractor(3).extract_search_results(&html);
    assert_eq!(results.len(), 3);
    assert_eq!(results[2].title, "书2");
}

#[test]
fn test_list_layout_with_definition_pairs() {
    let html = r#"<html><body><ul class="result-list">
      <li>
        <h3><a href="https://catalog.example.com/book/9.html">流浪地球</a></h3>
        <dl><dt>作者</dt><dd>刘慈欣</dd><dt>平台</dt><dd>纵横</dd></dl>
        <img data-src="//img.example.com/9.jpg">
      </li>
    </ul></body></html>"#;

    let results = extractor(20).extract_search_results(html);

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].author, "刘慈欣");
    assert_eq!(results[0].platform.as_deref(), Some("纵横"));
    assert_eq!(
        results[0].cover_url,
        "https://images.weserv.nl/?url=https%3A%2F%2Fimg.example.com%2F9.jpg"
    );
}

#[test]
fn test_labels_with_inner_spaces() {
    let html = r#"<html><body>
      <div class="bookbox">
        <h4 class="bookname"><a href="/book/7.html">三体</a></h4>
        <p>作&nbsp;&nbsp;者：刘慈欣</p><p>类 别：科幻</p><p>字&#12288;数：88.8万</p>
      </div>
    </body></html>"#;

    let results = extractor(20).extract_search_results(html);

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].author, "刘慈欣");
    assert_eq!(results[0].category, "科幻");
    assert_eq!(results[0].word_count, 888_000);
}

#[test]
fn test_page_without_rows_yields_nothing() {
    let results = extractor(20).extract_search_results("<html><body><p>没有找到相关书籍</p></body></html>");
    assert!(results.is_empty());
}

#[test]
fn test_detail_from_structured_block() {
    let detail = extractor(20).extract_detail(DETAIL_PAGE);
    assert_eq!(detail.category.as_deref(), Some("科幻小说"));
    assert_eq!(detail.platform.as_deref(), Some("起点中文网"));
}

#[test]
fn test_detail_labels_with_inner_spaces() {
    let html = r#"<html><body><div id="info">
      <p>类&nbsp;&nbsp;别：科幻</p><p>来&nbsp;&nbsp;源：起点</p>
    </div></body></html>"#;

    let detail = extractor(20).extract_detail(html);
    assert_eq!(detail.category.as_deref(), Some("科幻"));
    assert_eq!(detail.platform.as_deref(), Some("起点"));
}

#[test]
fn test_detail_falls_back_to_document_text() {
    let html = r#"<html><body>
      <script>var category = "分类：广告";</script>
      <div class="wrapper">题材：悬疑 ・ 连载中</div>
      <section>平台：晋江文学城</section>
    </body></html>"#;

    let detail = extractor(20).extract_detail(html);
    assert_eq!(detail.category.as_deref(), Some("悬疑"));
    assert_eq!(detail.platform.as_deref(), Some("晋江文学城"));
}

#[test]
fn test_detail_without_labels_is_empty() {
    let detail = extractor(20).extract_detail("<html><body><h1>三体</h1></body></html>");
    assert!(detail.category.is_none());
    assert!(detail.platform.is_none());
}
