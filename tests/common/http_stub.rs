use std::io::{BufRead, BufReader, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::thread::JoinHandle;

/// What the stub remote observed while serving one push
#[derive(Debug, Default)]
pub struct RecordedPush {
    pub info_refs_authorization: Option<String>,
    pub receive_pack_authorization: Option<String>,
    pub receive_pack_body: Vec<u8>,
}

/// In-process receive-pack endpoint backing the push tests
///
/// Serves exactly one push: a GET on the ref advertisement answered with a
/// canned advertisement, then a POST of the pack answered with a canned
/// report. Runs on a background thread; [`ReceivePackStub::finish`] joins it
/// and hands back everything the remote saw.
pub struct ReceivePackStub {
    url: String,
    handle: JoinHandle<RecordedPush>,
}

impl ReceivePackStub {
    pub fn serve(advertised_master: Option<&str>, receive_pack_report: &str) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind stub listener");
        let url = format!(
            "http://{}",
            listener.local_addr().expect("Failed to read stub address")
        );

        let advertisement = match advertised_master {
            Some(tip) => format!(
                "001f# service=git-receive-pack\n0000\n{} refs/heads/master\n",
                tip
            ),
            None => String::from("001f# service=git-receive-pack\n0000\n"),
        };
        let report = receive_pack_report.to_string();

        let handle = std::thread::spawn(move || {
            let mut recorded = RecordedPush::default();

            let (mut stream, request) = read_request(&listener);
            recorded.info_refs_authorization = request.authorization;
            write_response(&mut stream, advertisement.as_bytes());

            let (mut stream, request) = read_request(&listener);
            recorded.receive_pack_authorization = request.authorization;
            recorded.receive_pack_body = request.body;
            write_response(&mut stream, report.as_bytes());

            recorded
        });

        ReceivePackStub { url, handle }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn finish(self) -> RecordedPush {
        self.handle.join().expect("Stub thread panicked")
    }
}

struct StubRequest {
    authorization: Option<String>,
    body: Vec<u8>,
}

fn read_request(listener: &TcpListener) -> (TcpStream, StubRequest) {
    let (stream, _) = listener.accept().expect("Failed to accept connection");
    let mut reader = BufReader::new(stream.try_clone().expect("Failed to clone stub stream"));

    let mut request_line = String::new();
    reader
        .read_line(&mut request_line)
        .expect("Failed to read request line");

    let mut authorization = None;
    let mut content_length = 0usize;
    loop {
        let mut header = String::new();
        reader.read_line(&mut header).expect("Failed to read header");
        let header = header.trim_end();
        if header.is_empty() {
            break;
        }

        if let Some((name, value)) = header.split_once(':') {
            if name.eq_ignore_ascii_case("authorization") {
                authorization = Some(value.trim().to_string());
            } else if name.eq_ignore_ascii_case("content-length") {
                content_length = value.trim().parse().expect("Invalid content-length");
            }
        }
    }

    let mut body = vec![0u8; content_length];
    reader
        .read_exact(&mut body)
        .expect("Failed to read request body");

    (
        stream,
        StubRequest {
            authorization,
            body,
        },
    )
}

fn write_response(stream: &mut TcpStream, body: &[u8]) {
    let head = format!(
        "HTTP/1.1 200 OK\r\ncontent-type: application/octet-stream\r\ncontent-length: {}\r\nconnection: close\r\n\r\n",
        body.len()
    );

    stream
        .write_all(head.as_bytes())
        .expect("Failed to write response head");
    stream.write_all(body).expect("Failed to write response body");
    stream.flush().expect("Failed to flush response");
}
