// demos/basic_usage.rs
//! Writing and reading a small binary message.

use serbuf::{Buffer, BufferError, SeekType};

fn main() -> Result<(), BufferError> {
    let mut buf = Buffer::new(64);
    buf.put_u32(0x1234_5678)?;
    buf.put_u16(3)?;
    buf.put_string(b"payload")?;
    buf.put_f32(9.81)?;

    println!("wrote {} bytes (capacity {})", buf.tell_put(), buf.size());

    buf.seek_get(SeekType::Head, 0)?;
    println!("magic:   {:#010x}", buf.get_u32()?);
    println!("count:   {}", buf.get_u16()?);
    println!("name:    {}", String::from_utf8_lossy(&buf.get_string()?));
    println!("gravity: {}", buf.get_f32()?);

    // Reading past the end faults instead of returning stale data.
    match buf.get_u32() {
        Ok(v) => println!("unexpected: {v}"),
        Err(e) => println!("further read fails: {e}"),
    }
    println!("valid after fault: {}", buf.is_valid());

    buf.clear();
    println!("valid after clear: {}", buf.is_valid());
    Ok(())
}
