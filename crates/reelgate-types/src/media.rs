/// Extensions the server treats as playable video, lowercase, without the dot.
pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "webm", "ogg"];

/// Lowercased extension of `name` if it is one of [`VIDEO_EXTENSIONS`].
pub fn video_extension(name: &str) -> Option<&'static str> {
    let (stem, ext) = name.rsplit_once('.')?;
    if stem.is_empty() {
        return None;
    }
    let ext = ext.to_ascii_lowercase();
    VIDEO_EXTENSIONS.iter().copied().find(|known| *known == ext)
}

/// MIME type sent with a streamed video.
pub fn content_type_for(name: &str) -> &'static str {
    match video_extension(name) {
        Some("mp4") => "video/mp4",
        Some("webm") => "video/webm",
        Some("ogg") => "video/ogg",
        _ => "application/octet-stream",
    }
}
