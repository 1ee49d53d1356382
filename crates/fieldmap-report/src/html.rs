//! Standalone HTML rendering of a mapping sheet.

use anyhow::{Context, Result};
use quick_xml::Writer;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};

use crate::workbook::{Sheet, tier_color};

pub const REPORT_HEADING: &str = "Field Mapping";
pub const REPORT_FOOTER: &str = "Generated by fieldmap";

const STYLE: &str = "
  body{font-family:Segoe UI,Arial,sans-serif;background:#fff;color:#0b3d2e;margin:24px}
  h1{color:#006a4d;margin:0 0 4px}
  h2{color:#006a4d;margin:16px 0 8px}
  .table-wrap{overflow:auto;border:1px solid #e5e5e5;border-radius:12px}
  table{border-collapse:collapse;width:100%}
  th{background:#e6f2ee;color:#0b3d2e;text-align:left;padding:10px;font-weight:600;position:sticky;top:0}
  td{padding:8px;border-top:1px solid #eee}
  td.score{text-align:center}
  .footer{margin-top:12px;color:#666;font-size:12px}
";

/// Renders a sheet as a self-contained HTML document titled `title`.
///
/// Cell text is escaped; score cells carry their tier background inline.
pub fn render_html(title: &str, sheet: &Sheet) -> Result<String> {
    let mut xml = Writer::new_with_indent(Vec::new(), b' ', 2);

    xml.write_event(Event::DocType(BytesText::from_escaped("html")))?;
    let mut html = BytesStart::new("html");
    html.push_attribute(("lang", "en"));
    xml.write_event(Event::Start(html))?;

    xml.write_event(Event::Start(BytesStart::new("head")))?;
    let mut meta = BytesStart::new("meta");
    meta.push_attribute(("charset", "utf-8"));
    xml.write_event(Event::Empty(meta))?;
    text_element(&mut xml, "title", None, title)?;
    xml.write_event(Event::Start(BytesStart::new("style")))?;
    xml.write_event(Event::Text(BytesText::from_escaped(STYLE)))?;
    xml.write_event(Event::End(BytesEnd::new("style")))?;
    xml.write_event(Event::End(BytesEnd::new("head")))?;

    xml.write_event(Event::Start(BytesStart::new("body")))?;
    text_element(&mut xml, "h1", None, REPORT_HEADING)?;
    text_element(&mut xml, "h2", None, title)?;

    let mut wrap = BytesStart::new("div");
    wrap.push_attribute(("class", "table-wrap"));
    xml.write_event(Event::Start(wrap))?;
    xml.write_event(Event::Start(BytesStart::new("table")))?;

    xml.write_event(Event::Start(BytesStart::new("thead")))?;
    xml.write_event(Event::Start(BytesStart::new("tr")))?;
    for column in &sheet.columns {
        text_element(&mut xml, "th", None, &column.header)?;
    }
    xml.write_event(Event::End(BytesEnd::new("tr")))?;
    xml.write_event(Event::End(BytesEnd::new("thead")))?;

    xml.write_event(Event::Start(BytesStart::new("tbody")))?;
    for row in &sheet.rows {
        xml.write_event(Event::Start(BytesStart::new("tr")))?;
        for cell in row {
            let style = cell
                .fill
                .map(|tier| format!("background:{};", tier_color(tier)));
            text_element(&mut xml, "td", style.as_deref(), &cell.value)?;
        }
        xml.write_event(Event::End(BytesEnd::new("tr")))?;
    }
    xml.write_event(Event::End(BytesEnd::new("tbody")))?;

    xml.write_event(Event::End(BytesEnd::new("table")))?;
    xml.write_event(Event::End(BytesEnd::new("div")))?;

    let mut footer = BytesStart::new("div");
    footer.push_attribute(("class", "footer"));
    xml.write_event(Event::Start(footer))?;
    xml.write_event(Event::Text(BytesText::new(REPORT_FOOTER)))?;
    xml.write_event(Event::End(BytesEnd::new("div")))?;

    xml.write_event(Event::End(BytesEnd::new("body")))?;
    xml.write_event(Event::End(BytesEnd::new("html")))?;

    String::from_utf8(xml.into_inner()).context("html output is not utf-8")
}

/// Writes `<name>text</name>`, always with an explicit end tag.
fn text_element(
    xml: &mut Writer<Vec<u8>>,
    name: &str,
    style: Option<&str>,
    text: &str,
) -> Result<()> {
    let mut start = BytesStart::new(name);
    if let Some(style) = style {
        start.push_attribute(("class", "score"));
        start.push_attribute(("style", style));
    }
    xml.write_event(Event::Start(start))?;
    if !text.is_empty() {
        xml.write_event(Event::Text(BytesText::new(text)))?;
    }
    xml.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}
