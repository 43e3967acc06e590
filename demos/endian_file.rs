// demos/endian_file.rs
//! Producing a big-endian file image and detecting its byte order on
//! load via the magic number.

use serbuf::{classify, Buffer, BufferError, EndianClass, FieldKind, RecordLayout, SeekType};

const MAGIC: u32 = 0x53425546; // "SBUF"

fn header_layout() -> RecordLayout {
    // struct Header { magic: u32, version: u16, flags: u16 }
    RecordLayout::new(8)
        .field(0, FieldKind::U32)
        .field(4, FieldKind::U16)
        .field(6, FieldKind::U16)
}

fn write_file(big_endian: bool) -> Result<Vec<u8>, BufferError> {
    let mut buf = Buffer::new(64);
    buf.set_big_endian(big_endian);
    buf.put_u32(MAGIC)?;
    buf.put_u16(2)?; // version
    buf.put_u16(0)?; // flags
    buf.put_f32(0.016)?;
    Ok(buf.data().to_vec())
}

fn read_file(image: Vec<u8>) -> Result<(), BufferError> {
    let mut buf = Buffer::from_vec(image);

    // Peek the magic natively to learn the file's byte order.
    let raw = buf.get_u32()?;
    match classify(raw, MAGIC) {
        EndianClass::Matches => println!("  native-endian file"),
        EndianClass::Swapped => {
            println!("  foreign-endian file, enabling swap");
            buf.activate_byte_swapping(true);
        }
        EndianClass::Neither => {
            println!("  not one of ours");
            return Ok(());
        }
    }

    // Re-read the whole header as a record now that the order is known.
    buf.seek_get(SeekType::Head, 0)?;
    let mut header = [0u8; 8];
    buf.get_record(&mut header, &header_layout())?;
    let tick = buf.get_f32()?;
    println!("  header {header:02x?}, tick interval {tick}");
    Ok(())
}

fn main() -> Result<(), BufferError> {
    println!("little-endian image:");
    read_file(write_file(false)?)?;
    println!("big-endian image:");
    read_file(write_file(true)?)?;
    Ok(())
}
