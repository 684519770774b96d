//! Integration tests: wire round trips for the RFC 2326 example requests,
//! framed reads over a real TCP connection, and pool bounds under
//! concurrent use.

use std::io::Write;
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Duration;

use rtsp::{BufferPool, Method, ParseError, PoolConfig, RequestReader, RtspRequest, Url};

struct Case {
    name: &'static str,
    bytes: Vec<u8>,
    request: RtspRequest,
}

const ANNOUNCE_SDP: &str = "v=0\n\
    o=mhandley 2890844526 2890845468 IN IP4 126.16.64.4\n\
    s=SDP Seminar\n\
    i=A Seminar on the session description protocol\n\
    u=http://www.cs.ucl.ac.uk/staff/M.Handley/sdp.03.ps\n\
    e=mjh@isi.edu (Mark Handley)\n\
    c=IN IP4 224.2.17.12/127\n\
    t=2873397496 2873404696\n\
    a=recvonly\n\
    m=audio 3456 RTP/AVP 0\n\
    m=video 2232 RTP/AVP 31\n";

fn media_url() -> Url {
    Url::parse("rtsp://example.com/media.mp4").unwrap()
}

fn cases() -> Vec<Case> {
    vec![
        Case {
            name: "options",
            bytes: b"OPTIONS rtsp://example.com/media.mp4 RTSP/1.0\r\n\
                     CSeq: 1\r\n\
                     Proxy-Require: gzipped-messages\r\n\
                     Require: implicit-play\r\n\
                     \r\n"
                .to_vec(),
            request: RtspRequest::new(Method::Options, media_url())
                .with_header("CSeq", "1")
                .with_header("Require", "implicit-play")
                .with_header("Proxy-Require", "gzipped-messages"),
        },
        Case {
            name: "describe",
            bytes: b"DESCRIBE rtsp://example.com/media.mp4 RTSP/1.0\r\n\
                     CSeq: 2\r\n\
                     \r\n"
                .to_vec(),
            request: RtspRequest::new(Method::Describe, media_url()).with_header("CSeq", "2"),
        },
        Case {
            name: "announce",
            bytes: [
                b"ANNOUNCE rtsp://example.com/media.mp4 RTSP/1.0\r\n\
                  CSeq: 7\r\n\
                  Content-Length: 306\r\n\
                  Content-Type: application/sdp\r\n\
                  Date: 23 Jan 1997 15:35:06 GMT\r\n\
                  Session: 12345678\r\n\
                  \r\n"
                    .as_slice(),
                ANNOUNCE_SDP.as_bytes(),
            ]
            .concat(),
            request: RtspRequest::new(Method::Announce, media_url())
                .with_header("CSeq", "7")
                .with_header("Date", "23 Jan 1997 15:35:06 GMT")
                .with_header("Session", "12345678")
                .with_header("Content-Type", "application/sdp")
                .with_content(ANNOUNCE_SDP.as_bytes().to_vec()),
        },
        Case {
            name: "get_parameter",
            bytes: b"GET_PARAMETER rtsp://example.com/media.mp4 RTSP/1.0\r\n\
                     CSeq: 9\r\n\
                     Content-Length: 24\r\n\
                     Content-Type: text/parameters\r\n\
                     Session: 12345678\r\n\
                     \r\n\
                     packets_received\n\
                     jitter\n"
                .to_vec(),
            request: RtspRequest::new(Method::GetParameter, media_url())
                .with_header("CSeq", "9")
                .with_header("Content-Type", "text/parameters")
                .with_header("Session", "12345678")
                .with_content(b"packets_received\njitter\n".to_vec()),
        },
    ]
}

#[test]
fn requests_parse_from_wire_bytes() {
    for case in cases() {
        let parsed = RtspRequest::parse(&case.bytes)
            .unwrap_or_else(|e| panic!("{}: parse failed: {e}", case.name));
        assert_eq!(parsed, case.request, "{}", case.name);
    }
}

#[test]
fn requests_serialize_to_wire_bytes() {
    for case in cases() {
        assert_eq!(
            String::from_utf8_lossy(&case.request.serialize()),
            String::from_utf8_lossy(&case.bytes),
            "{}",
            case.name
        );
    }
}

#[test]
fn parse_of_serialize_is_identity() {
    for case in cases() {
        let wire = case.request.serialize();
        assert_eq!(RtspRequest::parse(&wire).unwrap(), case.request, "{}", case.name);
    }
}

#[test]
fn announce_declares_exact_content_length() {
    let announce = cases().remove(2).request;
    assert_eq!(announce.content.len(), 306);
    assert_eq!(announce.header.get("Content-Length"), Some("306"));
}

#[test]
fn truncated_body_then_rest_parses() {
    let case = cases().remove(3);
    let cut = case.bytes.len() - 10;
    assert_eq!(
        RtspRequest::parse(&case.bytes[..cut]),
        Err(ParseError::IncompleteContent {
            expected: 24,
            available: 14
        })
    );
    assert_eq!(RtspRequest::parse(&case.bytes).unwrap(), case.request);
}

#[test]
fn reader_frames_requests_from_tcp() {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().unwrap();

    let wire: Vec<u8> = cases().iter().flat_map(|c| c.bytes.clone()).collect();
    let client = thread::spawn(move || {
        let mut stream = TcpStream::connect(addr).expect("connect");
        for piece in wire.chunks(37) {
            stream.write_all(piece).unwrap();
            stream.flush().unwrap();
            thread::sleep(Duration::from_millis(1));
        }
    });

    let (stream, _) = listener.accept().expect("accept");
    stream
        .set_read_timeout(Some(Duration::from_secs(2)))
        .unwrap();

    let pool = BufferPool::new(PoolConfig {
        max_spare: 2,
        default_alloc_size: 64,
    });
    let mut reader = RequestReader::with_pool(stream, pool.clone());

    for case in cases() {
        let request = reader
            .read_request()
            .expect("read")
            .expect("request before EOF");
        assert_eq!(request, case.request, "{}", case.name);
    }

    client.join().unwrap();
    assert!(reader.read_request().unwrap().is_none());

    let stats = pool.stats();
    assert!(stats.spare <= 2);
    assert!(stats.reused > 0, "read buffers should be recycled: {stats}");
}

#[test]
fn concurrent_buffers_settle_at_cap() {
    let pool = BufferPool::new(PoolConfig::default());
    pool.set_max_spare(10);
    pool.set_default_alloc_size(64 * 1024);

    let workers = 4;
    let all_acquired = Arc::new(Barrier::new(workers));
    let handles: Vec<_> = (0..workers)
        .map(|_| {
            let pool = pool.clone();
            let all_acquired = all_acquired.clone();
            thread::spawn(move || {
                let held: Vec<_> = (0..5).map(|_| pool.get_buffer()).collect();
                all_acquired.wait();
                drop(held);
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(pool.spare_len(), 10);
    assert_eq!(pool.stats().allocated, 20);
}
