use std::collections::HashSet;

use ammonia::Builder as AmmoniaBuilder;
use comrak::Options;

pub(crate) fn default_options() -> Options<'static> {
    let mut options = Options::default();
    configure_extensions(&mut options);
    options
}

/// Sanitiser for untrusted output markup. Media elements stay so embedded audio
/// and video keep working; scripts are stripped.
pub(crate) fn build_output_sanitizer() -> AmmoniaBuilder<'static> {
    let mut builder = AmmoniaBuilder::default();

    builder.add_tags(&[
        "audio",
        "video",
        "source",
        "track",
        "picture",
        "figure",
        "figcaption",
        "section",
        "style",
    ]);
    builder.rm_clean_content_tags(&["style"]);

    let generic: HashSet<&'static str> =
        HashSet::from(["class", "id", "title", "lang", "dir", "style", "role"]);
    builder.generic_attributes(generic);
    builder.add_generic_attribute_prefixes(&["data-", "aria-"]);

    builder.add_tag_attributes(
        "audio",
        &["src", "controls", "preload", "loop", "muted", "autoplay"],
    );
    builder.add_tag_attributes(
        "video",
        &[
            "src", "controls", "preload", "loop", "muted", "autoplay", "poster", "width",
            "height",
        ],
    );
    builder.add_tag_attributes("source", &["src", "type", "media"]);
    builder.add_tag_attributes("track", &["src", "kind", "srclang", "label", "default"]);
    builder.add_tag_attributes("img", &["title", "loading", "decoding"]);
    builder.add_tag_attributes("th", &["align", "colspan", "rowspan", "scope"]);
    builder.add_tag_attributes("td", &["align", "colspan", "rowspan"]);

    builder.add_url_schemes(&["data"]);

    builder
}

fn configure_extensions(options: &mut Options<'static>) {
    let ext = &mut options.extension;
    ext.strikethrough = true;
    ext.table = true;
    ext.autolink = true;
    ext.tasklist = true;
    ext.footnotes = true;

    let render = &mut options.render;
    render.github_pre_lang = true;
    render.r#unsafe = true;
}
