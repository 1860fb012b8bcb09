//! 提取流水线集成测试
//!
//! 在临时目录中运行完整的提取批处理，检查生成的资源文件和改写后的文档

#[allow(dead_code)]
mod common {
    include!("common/mod.rs");
}

//  ██████╗  █████╗ ███████╗███████╗██╗███╗   ██╗ ██████╗
//  ██╔══██╗██╔══██╗██╔════╝██╔════╝██║████╗  ██║██╔════╝
//  ██████╔╝███████║███████╗███████╗██║██╔██╗ ██║██║  ███╗
//  ██╔═══╝ ██╔══██║╚════██║╚════██║██║██║╚██╗██║██║   ██║
//  ██║     ██║  ██║███████║███████║██║██║ ╚████║╚██████╔╝
//  ╚═╝     ╚═╝  ╚═╝╚══════╝╚══════╝╚═╝╚═╝  ╚═══╝ ╚═════╝

#[cfg(test)]
mod passing {
    use extricate::core::{extract_document, run_extraction, ExtricateOptions};

    use super::common::{AssertionHelper, TestWebDir, PAGE1_HTML};

    fn options(web: &TestWebDir) -> ExtricateOptions {
        ExtricateOptions {
            web_dir: web.path().to_path_buf(),
            silent: true,
        }
    }

    #[test]
    fn page1_scenario() {
        let web = TestWebDir::new().with_document("page1.html", PAGE1_HTML);

        let summary = run_extraction(&options(&web)).unwrap();
        assert_eq!((summary.succeeded, summary.total), (1, 1));

        assert_eq!(web.read("css/page1.css"), "body{color:red}");
        assert_eq!(web.read("js/page1.js"), "alert(1)");

        let html = web.read("page1.html");
        AssertionHelper::assert_occurs_once(&html, r#"<link rel="stylesheet" href="/css/page1.css">"#);
        AssertionHelper::assert_occurs_once(&html, r#"<script src="/js/page1.js"></script>"#);
        AssertionHelper::assert_occurs_once(&html, r#"<script src="/ext.js"></script>"#);
        assert!(!html.contains("alert(1)"));
        assert!(!html.contains("<style>"));
    }

    #[test]
    fn single_style_block_is_copied_verbatim() {
        let css = "\n  .card { padding: 8px; }\n  /* 统一容器样式 */\n";
        let web = TestWebDir::new()
            .with_document("card.html", &format!("<head><style>{css}</style></head><body></body>"));

        let report = extract_document(web.path(), "card.html").unwrap();

        assert_eq!(report.identity, "card");
        assert_eq!(report.css_written, Some(web.join("css/card.css")));
        assert_eq!(report.js_written, None);
        assert_eq!(web.read("css/card.css"), css);
        assert_eq!(
            web.read("card.html"),
            r#"<head><link rel="stylesheet" href="/css/card.css"></head><body></body>"#
        );
        assert!(!web.exists("js/card.js"));
    }

    #[test]
    fn inline_scripts_merge_and_external_scripts_survive() {
        let html = concat!(
            "<body>",
            r#"<script src="/lib/jquery.js"></script>"#,
            "<script>\n  const a = 1;\n</script>",
            r#"<script type="text/javascript" src="/common.js"></script>"#,
            "<script type=\"text/javascript\">\n  init(a);\n</script>",
            "<script>start();</script>",
            "</body>",
        );
        let web = TestWebDir::new().with_document("dashboard.html", html);

        run_extraction(&options(&web)).unwrap();

        assert_eq!(
            web.read("js/dashboard.js"),
            "const a = 1;\n\n\n\n  init(a);\n\n\nstart();"
        );

        let rewritten = web.read("dashboard.html");
        AssertionHelper::assert_occurs_once(&rewritten, r#"<script src="/js/dashboard.js"></script>"#);
        AssertionHelper::assert_in_order(
            &rewritten,
            &[
                r#"<script src="/lib/jquery.js"></script>"#,
                r#"<script src="/js/dashboard.js"></script>"#,
                r#"<script type="text/javascript" src="/common.js"></script>"#,
            ],
        );
        assert_eq!(AssertionHelper::count(&rewritten, "<script"), 3);
    }

    #[test]
    fn second_run_changes_nothing() {
        let web = TestWebDir::new().with_document("page1.html", PAGE1_HTML);
        run_extraction(&options(&web)).unwrap();

        let html_after_first = web.read("page1.html");
        let css_after_first = web.read("css/page1.css");
        let js_after_first = web.read("js/page1.js");

        let report = extract_document(web.path(), "page1.html").unwrap();

        assert!(!report.document_changed);
        assert_eq!(report.css_written, None);
        assert_eq!(report.js_written, None);
        assert_eq!(web.read("page1.html"), html_after_first);
        assert_eq!(web.read("css/page1.css"), css_after_first);
        assert_eq!(web.read("js/page1.js"), js_after_first);
    }

    #[test]
    fn existing_assets_are_overwritten() {
        let web = TestWebDir::new().with_document("page1.html", PAGE1_HTML);
        web.write("css/page1.css", "stale{}");

        run_extraction(&options(&web)).unwrap();

        assert_eq!(web.read("css/page1.css"), "body{color:red}");
    }

    #[test]
    fn documents_without_inline_blocks_are_untouched() {
        let html = r#"<head><link rel="stylesheet" href="/css/site.css"></head><script src="/a.js"></script>"#;
        let web = TestWebDir::new().with_document("plain.html", html);

        let report = extract_document(web.path(), "plain.html").unwrap();

        assert!(!report.document_changed);
        assert_eq!(web.read("plain.html"), html);
        assert!(!web.exists("css/plain.css"));
        assert!(!web.exists("js/plain.js"));
    }

    #[test]
    fn non_html_files_are_ignored_and_asset_dirs_created() {
        let web = TestWebDir::new()
            .with_document("notes.txt", "<style>a{}</style>")
            .with_document("b.html", "<style>b{}</style>")
            .with_document("a.html", "<style>a{}</style>");

        let summary = run_extraction(&options(&web)).unwrap();

        assert_eq!(summary.total, 2);
        assert!(summary.is_success());
        assert!(web.join("css").is_dir());
        assert!(web.join("js").is_dir());
        assert_eq!(web.read("notes.txt"), "<style>a{}</style>");
    }

    #[test]
    fn empty_directory_is_a_successful_empty_batch() {
        let web = TestWebDir::new();

        let summary = run_extraction(&options(&web)).unwrap();

        assert_eq!(summary.total, 0);
        assert!(summary.is_success());
    }
}

//  ███████╗ █████╗ ██╗██╗     ██╗███╗   ██╗ ██████╗
//  ██╔════╝██╔══██╗██║██║     ██║████╗  ██║██╔════╝
//  █████╗  ███████║██║██║     ██║██╔██╗ ██║██║  ███╗
//  ██╔══╝  ██╔══██║██║██║     ██║██║╚██╗██║██║   ██║
//  ██║     ██║  ██║██║███████╗██║██║ ╚████║╚██████╔╝
//  ╚═╝     ╚═╝  ╚═╝╚═╝╚══════╝╚═╝╚═╝  ╚═══╝ ╚═════╝

#[cfg(test)]
mod failing {
    use extricate::core::{extract_document, run_extraction, ExtricateError, ExtricateOptions};

    use super::common::{TestWebDir, PAGE1_HTML};

    #[test]
    fn missing_document() {
        let web = TestWebDir::new();

        let error = extract_document(web.path(), "gone.html").unwrap_err();

        assert!(matches!(error, ExtricateError::MissingInputFile { .. }));
    }

    #[test]
    fn missing_web_dir_aborts_batch() {
        let web = TestWebDir::new();
        let file = web.join("not-a-dir");
        web.write("not-a-dir", "");

        let result = run_extraction(&ExtricateOptions {
            web_dir: file,
            silent: true,
        });

        assert!(result.is_err());
    }

    #[cfg(unix)]
    #[test]
    fn one_failing_document_does_not_stop_the_batch() {
        use std::fs;

        let web = TestWebDir::new()
            .with_document("a_good.html", PAGE1_HTML)
            .with_document("b_bad.html", "<style>x{}</style>")
            .with_document("c_good.html", "<script>go()</script>");

        // A directory where the CSS file should go makes that one write fail
        fs::create_dir_all(web.join("css/b_bad.css")).unwrap();

        let summary = run_extraction(&ExtricateOptions {
            web_dir: web.path().to_path_buf(),
            silent: true,
        })
        .unwrap();

        assert_eq!(summary.total, 3);
        assert_eq!(summary.succeeded, 2);
        assert_eq!(summary.failures.len(), 1);
        assert_eq!(summary.failures[0].document, "b_bad.html");
        assert!(matches!(
            summary.failures[0].error,
            ExtricateError::WriteFailure { .. }
        ));

        // The failed document keeps its inline style
        assert_eq!(web.read("b_bad.html"), "<style>x{}</style>");
        assert_eq!(web.read("js/c_good.js"), "go()");
        assert_eq!(web.read("css/a_good.css"), "body{color:red}");
    }
}
