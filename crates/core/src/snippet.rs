use crate::escape;

/// Identity reported when no user is signed in.
pub const ANONYMOUS: &str = "Anonymous";

/// Marker embedded in place of the tracking id when the current account
/// cannot be resolved.
pub const UNRESOLVED: &str = "Error";

/// Render the page tracking script for `analytics_id`.
///
/// The id is embedded as given, including the [`UNRESOLVED`] marker. An absent
/// or empty `identity` is reported as [`ANONYMOUS`]. Both values are escaped
/// for a single-quoted script string; valid ids and emails are unchanged.
pub fn render_snippet(analytics_id: &str, identity: Option<&str>) -> String {
    let identity = identity.filter(|s| !s.is_empty()).unwrap_or(ANONYMOUS);
    format!(
        "<script type='text/javascript'>
    var _gaq = _gaq || [];
    _gaq.push(['_setAccount', '{account}']);
    _gaq.push(['_trackPageview']);

    _gaq.push(['_setCustomVar', 1, 'NTUserName', '{identity}', 1]);

    (function() {{
        var ga = document.createElement('script'); ga.type = 'text/javascript'; ga.async = true;
        ga.src = ('https:' == document.location.protocol ? 'https://ssl' : 'http://www') + '.google-analytics.com/ga.js';
        var s = document.getElementsByTagName('script')[0]; s.parentNode.insertBefore(ga, s);
    }})();
</script>",
        account = escape::js_string(analytics_id),
        identity = escape::js_string(identity),
    )
}
