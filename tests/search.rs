use bk_palette::builds::{search_pipelines, Pipeline};
use bk_palette::search::{fuzzy_score, EXACT_SCORE, SUBSTRING_SCORE};
use proptest::prelude::*;

fn pipeline(slug: &str, name: &str, description: Option<&str>) -> Pipeline {
    Pipeline {
        id: slug.into(),
        slug: slug.into(),
        name: name.into(),
        description: description.map(str::to_string),
        web_url: None,
    }
}

#[test]
fn pipeline_name_outranks_description() {
    let pipelines = [
        pipeline("docs", "Documentation", Some("deploy the docs site")),
        pipeline("deploy", "Deploy", None),
    ];
    let hits = search_pipelines(&pipelines, "deploy");
    let slugs: Vec<&str> = hits.iter().map(|h| h.item.slug.as_str()).collect();
    assert_eq!(slugs, ["deploy", "docs"]);
}

#[test]
fn tied_pipelines_keep_list_order() {
    let pipelines = [
        pipeline("zz-web", "Zz Web", None),
        pipeline("aa-web", "Aa Web", None),
        pipeline("mm-web", "Mm Web", None),
    ];
    let hits = search_pipelines(&pipelines, "web");
    let slugs: Vec<&str> = hits.iter().map(|h| h.item.slug.as_str()).collect();
    assert_eq!(slugs, ["zz-web", "aa-web", "mm-web"]);
}

#[test]
fn blank_query_finds_no_pipelines() {
    let pipelines = [pipeline("web", "Web", None)];
    assert!(search_pipelines(&pipelines, "  ").is_empty());
}

proptest! {
    #[test]
    fn identical_text_scores_exact(text in "[a-zA-Z0-9]{1,24}") {
        prop_assert_eq!(fuzzy_score(&text, &text.to_uppercase()), EXACT_SCORE);
    }

    #[test]
    fn strict_substring_scores_eighty(
        prefix in "[a-z]{1,8}",
        query in "[0-9]{1,8}",
        suffix in "[a-z]{0,8}",
    ) {
        let text = format!("{prefix}{query}{suffix}");
        prop_assert_eq!(fuzzy_score(&text, &query), SUBSTRING_SCORE);
    }

    #[test]
    fn blank_query_scores_zero(text in "[a-z]{1,16}") {
        prop_assert_eq!(fuzzy_score(&text, ""), 0);
    }
}
