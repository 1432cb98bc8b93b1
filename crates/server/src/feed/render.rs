//! RSS 2.0 serialization.

use chrono::{DateTime, Utc};

use super::{Description, FeedDocument, FeedItem};

const ATOM_NS: &str = "http://www.w3.org/2005/Atom";
const CONTENT_NS: &str = "http://purl.org/rss/1.0/modules/content/";

/// RFC 822 date as feed readers expect it.
pub fn rfc822(ts: &DateTime<Utc>) -> String {
    ts.format("%a, %d %b %Y %H:%M:%S +0000").to_string()
}

/// Whether `c` may appear in an XML 1.0 document.
fn is_xml_char(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\r' | '\u{20}'..='\u{D7FF}' | '\u{E000}'..='\u{FFFD}' | '\u{10000}'..='\u{10FFFF}')
}

/// Escape text for element content and attribute values.
///
/// Characters XML 1.0 forbids are dropped.
pub fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars().filter(|c| is_xml_char(*c)) {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

/// Wrap markup in a CDATA section, splitting any embedded terminator.
///
/// Characters XML 1.0 forbids are dropped.
pub fn cdata(markup: &str) -> String {
    let clean: String = markup.chars().filter(|c| is_xml_char(*c)).collect();
    format!("<![CDATA[{}]]>", clean.replace("]]>", "]]]]><![CDATA[>"))
}

fn element(out: &mut String, indent: &str, name: &str, text: &str) {
    out.push_str(&format!("{indent}<{name}>{}</{name}>\n", escape_xml(text)));
}

fn render_item(out: &mut String, item: &FeedItem) {
    out.push_str("    <item>\n");
    element(out, "      ", "title", &item.title);
    match &item.description {
        Description::Markup(markup) => out.push_str(&format!("      <description>{}</description>\n", cdata(markup))),
        Description::Text(text) => element(out, "      ", "description", text),
    }
    if let Some(link) = &item.link {
        element(out, "      ", "link", link);
    }
    out.push_str(&format!("      <guid isPermaLink=\"false\">{}</guid>\n", escape_xml(&item.guid)));
    if let Some(pub_date) = &item.pub_date {
        element(out, "      ", "pubDate", &rfc822(pub_date));
    }
    out.push_str("    </item>\n");
}

/// Serialize `doc` as an indented RSS 2.0 document.
pub fn render_rss(doc: &FeedDocument) -> String {
    let mut out = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    out.push_str(&format!(
        "<rss version=\"2.0\" xmlns:atom=\"{ATOM_NS}\" xmlns:content=\"{CONTENT_NS}\">\n"
    ));
    out.push_str("  <channel>\n");
    element(&mut out, "    ", "title", &doc.title);
    element(&mut out, "    ", "description", &doc.description);
    element(&mut out, "    ", "link", &doc.link);
    element(&mut out, "    ", "language", "en-us");
    element(&mut out, "    ", "lastBuildDate", &rfc822(&doc.last_build));
    for item in &doc.items {
        render_item(&mut out, item);
    }
    out.push_str("  </channel>\n</rss>\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    fn document() -> FeedDocument {
        FeedDocument {
            title: "Daily Bible Reading - NT (1 ch/day)".into(),
            description: "Complete Bible text for daily reading - 1 chapter per day".into(),
            link: "http://localhost:5000/".into(),
            last_build: at("2026-03-01T09:30:00Z"),
            items: vec![FeedItem {
                title: "Day 1: Matthew 1 (Mar 01)".into(),
                link: Some("https://www.biblegateway.com/passage/?search=Matthew+1&version=ESV".into()),
                guid: "bible-nt-20260301-1ch".into(),
                pub_date: Some(at("2026-03-01T06:00:00Z")),
                description: Description::Markup("<h2>📖 Matthew 1</h2>".into()),
            }],
        }
    }

    #[test]
    fn test_rfc822() {
        assert_eq!(rfc822(&at("2026-03-01T06:00:00Z")), "Sun, 01 Mar 2026 06:00:00 +0000");
    }

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml("a & b <c> \"d\" 'e'"), "a &amp; b &lt;c&gt; &quot;d&quot; &apos;e&apos;");
    }

    #[test]
    fn test_cdata_splits_terminator() {
        assert_eq!(cdata("x]]>y"), "<![CDATA[x]]]]><![CDATA[>y]]>");
    }

    #[test]
    fn test_control_characters_are_dropped() {
        assert_eq!(escape_xml("verse\u{0B}text\u{0C}\u{0}"), "versetext");
        assert_eq!(escape_xml("a\tb\r\nc\u{FFFE}"), "a\tb\r\nc");
        assert_eq!(cdata("verse\u{0B}text\u{0C}"), "<![CDATA[versetext]]>");

        let mut doc = document();
        doc.title = "Day 1\u{1B}".into();
        doc.items[0].description = Description::Markup("<p>verse\u{0B}text\u{0C}</p>".into());
        let plain = FeedItem { description: Description::Text("plain\u{7}".into()), ..doc.items[0].clone() };
        doc.items.push(plain);

        let xml = render_rss(&doc);
        let illegal: Vec<char> = xml.chars().filter(|c| !is_xml_char(*c)).collect();
        assert!(illegal.is_empty(), "illegal characters in output: {illegal:?}");
        assert!(xml.contains("<![CDATA[<p>versetext</p>]]>"));
        assert!(xml.contains("<description>plain</description>"));
    }

    #[test]
    fn test_render_rss() {
        let xml = render_rss(&document());

        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<rss version=\"2.0\""));
        assert!(xml.contains("xmlns:content=\"http://purl.org/rss/1.0/modules/content/\""));
        assert!(xml.contains("<language>en-us</language>"));
        assert!(xml.contains("<lastBuildDate>Sun, 01 Mar 2026 09:30:00 +0000</lastBuildDate>"));
        assert!(xml.contains("<description><![CDATA[<h2>📖 Matthew 1</h2>]]></description>"));
        assert!(xml.contains("<link>https://www.biblegateway.com/passage/?search=Matthew+1&amp;version=ESV</link>"));
        assert!(xml.contains("<guid isPermaLink=\"false\">bible-nt-20260301-1ch</guid>"));
        assert!(xml.contains("<pubDate>Sun, 01 Mar 2026 06:00:00 +0000</pubDate>"));
        assert!(xml.trim_end().ends_with("</rss>"));
    }

    #[test]
    fn test_render_error_document() {
        let doc = FeedDocument::error("UNKNOWN_PLAN: <x>", "http://localhost:5000/", at("2026-03-01T12:00:00Z"));
        let xml = render_rss(&doc);

        assert!(xml.contains("<title>Bible RSS Feed - Error</title>"));
        assert!(xml.contains("<description>Error generating feed: UNKNOWN_PLAN: &lt;x&gt;</description>"));
        assert!(xml.contains("<title>Feed Generation Error</title>"));
        assert!(xml.contains("<guid isPermaLink=\"false\">error-20260301120000</guid>"));
        assert!(!xml.contains("<pubDate>"));
        assert_eq!(xml.matches("<item>").count(), 1);
    }
}
