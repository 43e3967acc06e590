// demos/text_config.rs
//! Generating an indented config file, then parsing it back.

use std::fmt::Write as _;

use serbuf::{c_string_conversion, Buffer, CharacterSet, SeekType};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut buf = Buffer::text(512);

    writeln!(buf, "// video settings")?;
    writeln!(buf, "video {{")?;
    buf.push_tab();
    writeln!(buf, "width 1920")?;
    writeln!(buf, "height 1080")?;
    write!(buf, "title ")?;
    buf.put_delimited_string(c_string_conversion(), b"Main \"Game\" Window\n")?;
    writeln!(buf)?;
    buf.pop_tab();
    writeln!(buf, "}}")?;

    print!("{}", String::from_utf8_lossy(buf.data()));

    buf.seek_get(SeekType::Head, 0)?;
    let breaks = CharacterSet::new("{}");
    let section = buf.parse_token_breaks(&breaks, 64, true)?;
    println!("section: {section}");

    buf.get_token("width")?;
    let width = buf.get_i32()?;
    buf.get_token("height")?;
    let height = buf.get_i32()?;
    println!("parsed {width}x{height}");

    buf.get_token("title")?;
    let title = buf.get_delimited_string(c_string_conversion())?;
    println!("title: {:?}", String::from_utf8_lossy(&title));
    Ok(())
}
