use shared::protocol::ResultDocument;

use crate::utils::{format_date, truncate};

/// Popup markup for a result. Field values are inserted verbatim; the search index is
/// trusted to hold safe HTML.
pub fn info_window_html(doc: &ResultDocument, max_field_length: usize) -> String {
    let uri = doc.referrer_uri.as_deref().unwrap_or_default();
    let title = doc.title.as_deref().unwrap_or_default();
    let from = format_date(doc.from_date.as_deref());
    let to = format_date(doc.to_date.as_deref());
    let summary = truncate(doc.abstract_text.as_deref(), max_field_length);

    format!(
        "<div class='infowindow'>\
         <div class='title'><a href='{uri}'>{title}</a></div>\
         <div class='existdates'>{from} - {to}</div>\
         <div class='summary'>{summary}</div>\
         </div>"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::domain::DocumentId;

    #[test]
    fn renders_link_dates_and_truncated_summary() {
        let doc = ResultDocument {
            id: DocumentId::from("E1"),
            title: Some("Murray <b>River</b> Commission".into()),
            abstract_text: Some("Established to manage the river system".into()),
            from_date: Some("1917-01-01T00:00:00Z".into()),
            to_date: Some("1988-01-01T00:00:00Z".into()),
            referrer_uri: Some("http://example.org/E1".into()),
            ..Default::default()
        };

        assert_eq!(
            info_window_html(&doc, 20),
            "<div class='infowindow'>\
             <div class='title'><a href='http://example.org/E1'>Murray <b>River</b> Commission</a></div>\
             <div class='existdates'>1917 - 1988</div>\
             <div class='summary'>Established to ...</div>\
             </div>"
        );
    }
}
