//! Output formats for tile lists

use std::io::Write;

use crate::error::Error;
use crate::tile::Tile;

mod serializable;

pub use serializable::SerializableIterator;

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "binary", derive(clap::ValueEnum))]
pub enum Format {
    /// One `zoom/x/y` per line followed by the suffix
    #[default]
    Text,

    /// A list of `{"z": .., "x": .., "y": ..}` objects
    Json,

    /// Same as json, encoded as message pack
    #[cfg(feature = "message-pack")]
    MessagePack,
}

impl Format {
    /// Write tiles in their given order
    ///
    /// The suffix is only used by [`Format::Text`].
    pub fn write(
        &self,
        mut writer: impl Write,
        tiles: impl Iterator<Item = Tile>,
        suffix: &str,
    ) -> Result<(), Error> {
        match self {
            Format::Text => {
                for tile in tiles {
                    writeln!(writer, "{tile}{suffix}")?;
                }
            }
            Format::Json => {
                serde_json::to_writer(&mut writer, &SerializableIterator::new(tiles))?;
                writeln!(writer)?;
            }
            #[cfg(feature = "message-pack")]
            Format::MessagePack => {
                rmp_serde::encode::write_named(&mut writer, &SerializableIterator::new(tiles))?
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::Format;
    use crate::tile::Tile;

    fn tiles() -> impl Iterator<Item = Tile> {
        [Tile::new(0, 0, 0), Tile::new(1, 1, 0)].into_iter()
    }

    fn written(format: Format, suffix: &str) -> Vec<u8> {
        let mut buffer = Vec::new();
        format.write(&mut buffer, tiles(), suffix).unwrap();
        buffer
    }

    #[test]
    fn text() {
        assert_eq!(written(Format::Text, ".png"), b"0/0/0.png\n1/1/0.png\n");
        assert_eq!(written(Format::Text, "@2x"), b"0/0/0@2x\n1/1/0@2x\n");
    }

    #[test]
    fn json() {
        assert_eq!(
            String::from_utf8(written(Format::Json, ".png")).unwrap(),
            "[{\"z\":0,\"x\":0,\"y\":0},{\"z\":1,\"x\":1,\"y\":0}]\n"
        );

        let mut buffer = Vec::new();
        Format::Json
            .write(&mut buffer, std::iter::empty(), ".png")
            .unwrap();
        assert_eq!(buffer, b"[]\n");
    }

    #[cfg(feature = "message-pack")]
    #[test]
    fn message_pack() {
        let buffer = written(Format::MessagePack, ".png");
        let decoded: Vec<Tile> = rmp_serde::from_slice(&buffer).unwrap();
        assert_eq!(decoded, tiles().collect::<Vec<_>>());
    }
}
