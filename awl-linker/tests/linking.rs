use awl_linker::{
  Dictionary,
  KeywordEntry,
  Linker,
  LinkerOptions,
  RelAttribute,
};

fn single_keyword(keyword: &str, url: &str, max_per_post: u32) -> Dictionary {
  let mut dictionary = Dictionary::new();
  dictionary.insert(
    keyword,
    KeywordEntry::new(url, max_per_post, RelAttribute::Dofollow),
  );
  dictionary
}

fn default_linker() -> Linker {
  Linker::new(LinkerOptions::default())
}

fn anchor_count(html: &str) -> usize {
  html.matches("<a ").count()
}

#[test]
fn test_first_occurrence_only_is_linked() {
  let dictionary = single_keyword("widget", "https://x.test/w", 1);
  let result = default_linker().annotate(
    "<p>Buy a widget today. Another widget later.</p>",
    &dictionary,
  );

  assert_eq!(result.links_added, 1);
  assert_eq!(
    result.html,
    "<p>Buy a <a class=\"awl-link\" href=\"https://x.test/w\" \
     title=\"widget\">widget</a> today. Another widget later.</p>"
  );
}

#[test]
fn test_one_link_per_text_node_even_under_cap() {
  // Cap allows three, but a single text node may only be split once.
  let dictionary = single_keyword("widget", "https://x.test/w", 3);
  let result = default_linker()
    .annotate("<p>widget widget widget</p>", &dictionary);

  assert_eq!(result.links_added, 1);
  assert_eq!(anchor_count(&result.html), 1);
  assert!(
    result.html.contains("</a> widget widget</p>"),
    "later occurrences should stay plain text: {}",
    result.html
  );
}

#[test]
fn test_global_cap_applies_across_keywords() {
  let mut dictionary = Dictionary::new();
  for keyword in ["alpha", "beta", "gamma", "delta", "epsilon"] {
    dictionary.insert(
      keyword,
      KeywordEntry::new(
        format!("https://x.test/{keyword}"),
        3,
        RelAttribute::Dofollow,
      ),
    );
  }

  let html = "<p>alpha here</p><p>beta here</p><p>gamma here</p>\
              <p>delta here</p><p>epsilon here</p>";
  let result = default_linker().annotate(html, &dictionary);

  assert_eq!(result.links_added, 3);
  assert_eq!(anchor_count(&result.html), 3);
  assert!(result.html.contains("title=\"alpha\""));
  assert!(result.html.contains("title=\"beta\""));
  assert!(result.html.contains("title=\"gamma\""));
  assert!(!result.html.contains("title=\"delta\""));
  assert!(!result.html.contains("title=\"epsilon\""));
}

#[test]
fn test_per_keyword_cap_is_enforced() {
  let dictionary = single_keyword("widget", "https://x.test/w", 2);
  let html = "<p>widget one</p><p>widget two</p><p>widget three</p>";
  let result = default_linker().annotate(html, &dictionary);

  assert_eq!(result.links_added, 2);
  assert_eq!(anchor_count(&result.html), 2);
  assert!(
    result.html.contains("<p>widget three</p>"),
    "third occurrence should stay plain once the keyword cap is spent: {}",
    result.html
  );
}

#[test]
fn test_heading_skipped_paragraph_linked() {
  let dictionary = single_keyword("widget", "https://x.test/w", 1);
  let result = default_linker().annotate(
    "<h2>Our widget guide</h2><p>Buy a widget.</p>",
    &dictionary,
  );

  assert_eq!(result.links_added, 1);
  assert!(result.html.contains("<h2>Our widget guide</h2>"));
  assert!(result.html.contains(
    "<p>Buy a <a class=\"awl-link\" href=\"https://x.test/w\" \
     title=\"widget\">widget</a>.</p>"
  ));
}

#[test]
fn test_all_disallowed_ancestors_are_skipped() {
  let dictionary = single_keyword("term", "https://x.test/t", 6);
  let html = "<h1>term</h1><h3>term</h3><h6>term</h6>\
              <blockquote><p>term</p></blockquote>\
              <a href=\"/x\">term</a><p>term</p>";
  let result = default_linker().annotate(html, &dictionary);

  // Only the bare paragraph is eligible.
  assert_eq!(result.links_added, 1);
  assert!(result.html.contains("<h1>term</h1>"));
  assert!(result.html.contains("<h3>term</h3>"));
  assert!(result.html.contains("<h6>term</h6>"));
  assert!(result.html.contains("<blockquote><p>term</p></blockquote>"));
  assert!(result.html.contains("<a href=\"/x\">term</a>"));
  assert!(result.html.contains("title=\"term\""));
}

#[test]
fn test_text_nested_inside_existing_anchor_is_skipped() {
  let dictionary = single_keyword("widget", "https://x.test/w", 2);
  let result = default_linker().annotate(
    "<p><a href=\"/old\"><em>widget</em></a> and another widget</p>",
    &dictionary,
  );

  assert_eq!(result.links_added, 1);
  assert!(
    result.html.contains("<a href=\"/old\"><em>widget</em></a>"),
    "existing link content must stay untouched: {}",
    result.html
  );
  assert!(result.html.contains(
    "and another <a class=\"awl-link\" href=\"https://x.test/w\" \
     title=\"widget\">widget</a>"
  ));
}

#[test]
fn test_empty_dictionary_returns_input_verbatim() {
  let dictionary = Dictionary::new();
  let html = "<p>nothing to do<br>here</p>";
  let result = default_linker().annotate(html, &dictionary);

  assert_eq!(result.links_added, 0);
  assert_eq!(result.html, html);
}

#[test]
fn test_no_match_returns_input_verbatim() {
  // Even malformed input comes back byte-identical when nothing matched;
  // the parser's normalization must not leak out.
  let dictionary = single_keyword("absent", "https://x.test/a", 1);
  let html = "<p>unclosed paragraph";
  let result = default_linker().annotate(html, &dictionary);

  assert_eq!(result.links_added, 0);
  assert_eq!(result.html, html);
}

#[test]
fn test_nofollow_emitted_only_when_configured() {
  let mut dictionary = Dictionary::new();
  dictionary.insert(
    "sponsored",
    KeywordEntry::new("https://x.test/s", 1, RelAttribute::Nofollow),
  );
  dictionary.insert(
    "organic",
    KeywordEntry::new("https://x.test/o", 1, RelAttribute::Dofollow),
  );

  let result = default_linker().annotate(
    "<p>A sponsored term.</p><p>An organic term.</p>",
    &dictionary,
  );

  assert_eq!(result.links_added, 2);
  // Attributes serialize in insertion order: class, href, title, rel.
  assert!(result.html.contains(
    "<a class=\"awl-link\" href=\"https://x.test/s\" title=\"sponsored\" \
     rel=\"nofollow\">sponsored</a>"
  ));
  assert!(result.html.contains(
    "<a class=\"awl-link\" href=\"https://x.test/o\" \
     title=\"organic\">organic</a>"
  ));
}

#[test]
fn test_case_insensitive_match_preserves_document_casing() {
  let dictionary = single_keyword("Example", "https://x.test/e", 2);
  let result = default_linker()
    .annotate("<p>an EXAMPLE here</p><p>another example</p>", &dictionary);

  assert_eq!(result.links_added, 2);
  // Anchor text keeps the document form; title carries the dictionary
  // form.
  assert!(result.html.contains(
    "<a class=\"awl-link\" href=\"https://x.test/e\" \
     title=\"Example\">EXAMPLE</a>"
  ));
  assert!(result.html.contains(
    "<a class=\"awl-link\" href=\"https://x.test/e\" \
     title=\"Example\">example</a>"
  ));
}

#[test]
fn test_word_boundaries_reject_substrings() {
  let dictionary = single_keyword("cat", "https://x.test/c", 3);
  let result = default_linker().annotate(
    "<p>the category catalog concatenates</p>",
    &dictionary,
  );

  assert_eq!(result.links_added, 0);
  assert_eq!(result.html, "<p>the category catalog concatenates</p>");
}

#[test]
fn test_declaration_order_wins_for_overlapping_keywords() {
  let mut first_short = Dictionary::new();
  first_short.insert(
    "rust",
    KeywordEntry::new("https://x.test/rust", 1, RelAttribute::Dofollow),
  );
  first_short.insert(
    "rust book",
    KeywordEntry::new("https://x.test/book", 1, RelAttribute::Dofollow),
  );

  let result = default_linker()
    .annotate("<p>read the rust book today</p>", &first_short);
  assert_eq!(result.links_added, 1);
  assert!(result.html.contains("title=\"rust\">rust</a> book today"));

  let mut first_long = Dictionary::new();
  first_long.insert(
    "rust book",
    KeywordEntry::new("https://x.test/book", 1, RelAttribute::Dofollow),
  );
  first_long.insert(
    "rust",
    KeywordEntry::new("https://x.test/rust", 1, RelAttribute::Dofollow),
  );

  let result = default_linker()
    .annotate("<p>read the rust book today</p>", &first_long);
  assert_eq!(result.links_added, 1);
  assert!(result.html.contains("title=\"rust book\">rust book</a> today"));
}

#[test]
fn test_second_pass_runs_with_fresh_counters() {
  let dictionary = single_keyword("widget", "https://x.test/w", 1);
  let linker = default_linker();

  let first = linker.annotate("<p>widget</p><p>widget</p>", &dictionary);
  assert_eq!(first.links_added, 1);
  assert_eq!(anchor_count(&first.html), 1);

  // Caps are per call. On re-application the already-linked occurrence is
  // protected by its anchor ancestor, and the remaining one is fair game
  // for the fresh counters.
  let second = linker.annotate(&first.html, &dictionary);
  assert_eq!(second.links_added, 1);
  assert_eq!(anchor_count(&second.html), 2);
}

#[test]
fn test_unicode_keyword_in_unicode_text() {
  let dictionary = single_keyword("café", "https://x.test/cafe", 1);
  let result = default_linker()
    .annotate("<p>un Café noir, puis la cafétéria</p>", &dictionary);

  assert_eq!(result.links_added, 1);
  assert!(result.html.contains("title=\"café\">Café</a> noir"));
  assert!(
    result.html.contains("cafétéria"),
    "no match inside longer words: {}",
    result.html
  );
}

#[test]
fn test_href_is_attribute_escaped() {
  let dictionary = single_keyword("widget", "https://x.test/w?a=1&b=2", 1);
  let result =
    default_linker().annotate("<p>a widget here</p>", &dictionary);

  assert_eq!(result.links_added, 1);
  assert!(result.html.contains("href=\"https://x.test/w?a=1&amp;b=2\""));
}

#[test]
fn test_relative_target_url_is_kept() {
  let dictionary = single_keyword("widget", "/docs/widget", 1);
  let result =
    default_linker().annotate("<p>a widget here</p>", &dictionary);

  assert_eq!(result.links_added, 1);
  assert!(result.html.contains("href=\"/docs/widget\""));
}

#[test]
fn test_unusable_target_url_skips_entry_not_document() {
  let mut dictionary = Dictionary::new();
  dictionary.insert(
    "evil",
    KeywordEntry::new("javascript:alert(1)", 1, RelAttribute::Dofollow),
  );
  dictionary.insert(
    "good",
    KeywordEntry::new("https://x.test/g", 1, RelAttribute::Dofollow),
  );

  let result = default_linker()
    .annotate("<p>evil and good terms</p>", &dictionary);

  assert_eq!(result.links_added, 1);
  assert!(!result.html.contains("javascript:"));
  assert!(result.html.contains("title=\"good\">good</a>"));
}

#[test]
fn test_custom_link_class_and_cap() {
  let options = LinkerOptions {
    link_class: "glossary-ref".to_string(),
    max_links: 1,
    ..LinkerOptions::default()
  };
  let mut dictionary = Dictionary::new();
  dictionary.insert(
    "alpha",
    KeywordEntry::new("https://x.test/a", 3, RelAttribute::Dofollow),
  );
  dictionary.insert(
    "beta",
    KeywordEntry::new("https://x.test/b", 3, RelAttribute::Dofollow),
  );

  let result = Linker::new(options)
    .annotate("<p>alpha</p><p>beta</p>", &dictionary);

  assert_eq!(result.links_added, 1);
  assert!(result.html.contains("class=\"glossary-ref\""));
  assert!(result.html.contains("<p>beta</p>"));
}

#[test]
fn test_match_at_node_edges_inserts_no_empty_text() {
  let dictionary = single_keyword("widget", "https://x.test/w", 2);
  let result = default_linker().annotate("<p>widget</p>", &dictionary);

  assert_eq!(result.links_added, 1);
  assert_eq!(
    result.html,
    "<p><a class=\"awl-link\" href=\"https://x.test/w\" \
     title=\"widget\">widget</a></p>"
  );
}
