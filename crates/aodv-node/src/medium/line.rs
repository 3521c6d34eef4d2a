//! Line-oriented text medium, one base64-armored frame per line.
//!
//! Radio modems driven over a serial port report received frames as text
//! lines. This medium carries the same shape over any byte stream, usually a
//! TCP connection to a modem bridge:
//!
//! ```text
//! LR,<source hex>,<destination hex>,<base64 frame>
//! ```
//!
//! Lines that do not parse are logged and skipped; they never end the stream.

use std::net::SocketAddr;

use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader, Lines};
use tokio::net::TcpStream;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::sync::Mutex;

use aodv_core::framing::{armor, unarmor};
use aodv_core::types::NodeAddress;

use crate::error::NodeError;
use crate::medium::{Datagram, Medium, check_frame_size};

const LINE_TAG: &str = "LR";

/// Render one frame as a text line, without the trailing newline.
pub fn format_line(source: NodeAddress, destination: NodeAddress, frame: &[u8]) -> String {
    format!("{LINE_TAG},{source},{destination},{}", armor(frame))
}

/// Parse one text line back into a datagram.
pub fn parse_line(line: &str) -> Result<Datagram, NodeError> {
    let mut fields = line.trim().splitn(4, ',');
    let (Some(tag), Some(source), Some(destination), Some(body)) =
        (fields.next(), fields.next(), fields.next(), fields.next())
    else {
        return Err(NodeError::Medium(format!("malformed line '{line}'")));
    };
    if !tag.eq_ignore_ascii_case(LINE_TAG) {
        return Err(NodeError::Medium(format!("unexpected line tag '{tag}'")));
    }
    let address = |s: &str| {
        s.parse::<NodeAddress>()
            .map_err(|e| NodeError::Medium(format!("'{s}': {e}")))
    };
    Ok(Datagram {
        source: address(source)?,
        destination: address(destination)?,
        frame: unarmor(body)?,
    })
}

/// A medium that exchanges armored frames as lines over a byte stream.
pub struct LineMedium<R, W> {
    lines: Mutex<Lines<BufReader<R>>>,
    writer: Mutex<W>,
}

impl<R, W> LineMedium<R, W>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            lines: Mutex::new(BufReader::new(reader).lines()),
            writer: Mutex::new(writer),
        }
    }
}

impl LineMedium<OwnedReadHalf, OwnedWriteHalf> {
    /// Connect to a line-oriented peer such as a modem bridge.
    pub async fn connect(addr: SocketAddr) -> Result<Self, NodeError> {
        let stream = TcpStream::connect(addr).await?;
        tracing::info!(peer = %addr, "line medium connected");
        let (reader, writer) = stream.into_split();
        Ok(Self::new(reader, writer))
    }
}

impl<R, W> Medium for LineMedium<R, W>
where
    R: AsyncRead + Unpin + Send + 'static,
    W: AsyncWrite + Unpin + Send + 'static,
{
    async fn transmit(
        &self,
        source: NodeAddress,
        destination: NodeAddress,
        frame: &[u8],
    ) -> Result<(), NodeError> {
        check_frame_size(frame)?;
        let mut line = format_line(source, destination, frame);
        line.push('\n');
        let mut writer = self.writer.lock().await;
        writer.write_all(line.as_bytes()).await?;
        writer.flush().await?;
        Ok(())
    }

    async fn receive(&self) -> Result<Datagram, NodeError> {
        let mut lines = self.lines.lock().await;
        loop {
            let Some(line) = lines.next_line().await? else {
                return Err(NodeError::Stopped);
            };
            if line.trim().is_empty() {
                continue;
            }
            match parse_line(&line) {
                Ok(datagram) => return Ok(datagram),
                Err(e) => tracing::warn!("unreadable line dropped: {e}"),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use aodv_core::FramingError;
    use tokio::io::{AsyncReadExt, duplex};

    use super::*;
    use crate::medium::MAX_FRAME_SIZE;

    const A: NodeAddress = NodeAddress::new(0x0001);
    const B: NodeAddress = NodeAddress::new(0x0002);

    #[test]
    fn test_format_request_line() {
        let frame = hex::decode("060001000200000101").unwrap();
        assert_eq!(
            format_line(A, NodeAddress::BROADCAST, &frame),
            "LR,0001,FFFF,BgABAAIAAAEB"
        );
    }

    #[test]
    fn test_parse_line() {
        let datagram = parse_line("lr,0001,0002,BgABAAIAAAEB\r\n").unwrap();
        assert_eq!(datagram.source, A);
        assert_eq!(datagram.destination, B);
        assert_eq!(hex::encode(datagram.frame), "060001000200000101");
    }

    #[test]
    fn test_parse_line_errors() {
        assert!(matches!(
            parse_line("LR,0001,0002,not base64!"),
            Err(NodeError::Framing(FramingError::InvalidBase64))
        ));
        assert!(matches!(
            parse_line("LR,0001,0002,"),
            Err(NodeError::Framing(FramingError::Empty))
        ));
        assert!(matches!(parse_line("LR,0001"), Err(NodeError::Medium(_))));
        assert!(matches!(parse_line("AT,OK,0001,AAAA"), Err(NodeError::Medium(_))));
        assert!(matches!(parse_line("LR,zz,0002,AAAA"), Err(NodeError::Medium(_))));
    }

    #[tokio::test]
    async fn test_frames_cross_a_stream() {
        let (near, far) = duplex(4096);
        let (near_read, near_write) = tokio::io::split(near);
        let (far_read, far_write) = tokio::io::split(far);
        let sender = LineMedium::new(near_read, near_write);
        let receiver = LineMedium::new(far_read, far_write);

        sender.transmit(A, B, b"over the wire").await.unwrap();
        let heard = receiver.receive().await.unwrap();
        assert_eq!(heard.source, A);
        assert_eq!(heard.destination, B);
        assert_eq!(heard.frame, b"over the wire".to_vec());
    }

    #[tokio::test]
    async fn test_bad_lines_skipped() {
        let input = b"\nAT,OK\nLR,0001,0002,%%%\nLR,0001,FFFF,AAk=\n".to_vec();
        let medium = LineMedium::new(std::io::Cursor::new(input), tokio::io::sink());
        let heard = medium.receive().await.unwrap();
        assert!(heard.destination.is_broadcast());
        assert_eq!(heard.frame, vec![0x00, 0x09]);
        assert!(matches!(medium.receive().await, Err(NodeError::Stopped)));
    }

    #[tokio::test]
    async fn test_oversized_frame_refused() {
        let (near, mut far) = duplex(8192);
        let (near_read, near_write) = tokio::io::split(near);
        let medium = LineMedium::new(near_read, near_write);

        let err = medium
            .transmit(A, B, &vec![0u8; MAX_FRAME_SIZE + 1])
            .await
            .unwrap_err();
        assert!(matches!(err, NodeError::FrameTooLarge { .. }));

        drop(medium);
        let mut written = Vec::new();
        far.read_to_end(&mut written).await.unwrap();
        assert!(written.is_empty());
    }
}
