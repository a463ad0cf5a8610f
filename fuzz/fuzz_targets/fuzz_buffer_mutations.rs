#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use textgrid_core::{
    Color, FillElement, Position, Rect, ScreenBuffer, ScreenBufferConfig, Size, TextAttribute,
    WidthMarker,
};

#[derive(Debug, Arbitrary)]
enum Op {
    WriteText { text: String, x: u8, y: u8, wrapped: bool },
    InsertStream { text: String },
    FillGlyph { glyph: char, x: u8, y: u8, count: u8 },
    FillAttr { attr: u8, x: u8, y: u8, count: u8 },
    FillRect { glyph: char, left: u8, top: u8, w: u8, h: u8 },
    Resize { width: u8, height: u8, reflow: bool },
    MoveCursor { x: u8, y: u8 },
}

fn attr(n: u8) -> TextAttribute {
    TextAttribute::new(Color::Indexed(n), Color::Default)
}

fuzz_target!(|ops: Vec<Op>| {
    let mut screen = match ScreenBuffer::new(ScreenBufferConfig {
        buffer_size: Size::new(16, 12),
        window_size: Size::new(16, 12),
        default_attr: attr(7),
        popup_attr: attr(7).inverted(),
        ..ScreenBufferConfig::default()
    }) {
        Ok(screen) => screen,
        Err(_) => return,
    };

    for op in ops {
        match op {
            Op::WriteText { text, x, y, wrapped } => {
                let _ = screen.write_text(&text, Position::new(x.into(), y.into()), wrapped);
            }
            Op::InsertStream { text } => {
                let a = screen.attributes();
                for ch in text.chars() {
                    let _ = screen.buffer_mut().insert_glyph(ch, a);
                }
            }
            Op::FillGlyph { glyph, x, y, count } => {
                let _ = screen.fill(
                    FillElement::RealUnicode(glyph),
                    Position::new(x.into(), y.into()),
                    count.into(),
                );
            }
            Op::FillAttr { attr: a, x, y, count } => {
                let _ = screen.fill(
                    FillElement::Attribute(attr(a)),
                    Position::new(x.into(), y.into()),
                    count.into(),
                );
            }
            Op::FillRect { glyph, left, top, w, h } => {
                let rect = Rect::new(
                    left.into(),
                    top.into(),
                    u16::from(left) + u16::from(w),
                    u16::from(top) + u16::from(h),
                );
                let _ = screen.fill_rectangle(glyph, screen.attributes(), rect);
            }
            Op::Resize { width, height, reflow } => {
                let size = Size::new(u16::from(width % 40) + 1, u16::from(height % 24) + 1);
                let _ = screen.resize(size, reflow);
            }
            Op::MoveCursor { x, y } => {
                let size = screen.buffer_size();
                let pos = Position::new(
                    u16::from(x) % size.width,
                    u16::from(y) % size.height,
                );
                screen.buffer_mut().cursor_mut().set_position(pos);
            }
        }

        // Post-conditions that must always hold:
        let buffer = screen.buffer();
        let width = buffer.width();
        for y in 0..buffer.height() {
            let row = buffer.row(y);
            assert_eq!(
                row.attrs().total_length(),
                u32::from(width),
                "attr coverage != width"
            );
            let runs = row.attrs().runs();
            for pair in runs.windows(2) {
                assert_ne!(pair[0].attr, pair[1].attr, "adjacent equal runs");
            }
            let cells = row.chars().cells();
            for x in 0..usize::from(width) {
                match cells[x].marker {
                    WidthMarker::Leading => {
                        assert!(x + 1 < usize::from(width), "leading at last column");
                        assert_eq!(cells[x + 1].marker, WidthMarker::Trailing);
                    }
                    WidthMarker::Trailing => {
                        assert!(x > 0 && cells[x - 1].marker == WidthMarker::Leading);
                    }
                    WidthMarker::Single => {}
                }
            }
        }
        let cursor = buffer.cursor().position();
        assert!(cursor.x < width && cursor.y < buffer.height(), "cursor OOB");
    }
});
