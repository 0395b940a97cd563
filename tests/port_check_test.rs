use std::net::TcpListener;

use tetromino_battleship::server::check_tcp_listen_available;

#[test]
fn port_check_fails_when_port_in_use() {
    let listener = TcpListener::bind(("127.0.0.1", 0)).expect("bind ephemeral port");
    let port = listener.local_addr().unwrap().port();

    let err = check_tcp_listen_available("127.0.0.1", port).expect_err("expected addr in use");
    assert_eq!(err.kind(), std::io::ErrorKind::AddrInUse);
}

#[test]
fn port_check_passes_for_free_port() {
    let port = {
        let listener = TcpListener::bind(("127.0.0.1", 0)).expect("bind ephemeral port");
        listener.local_addr().unwrap().port()
    };
    check_tcp_listen_available("127.0.0.1", port).expect("released port should be free");
}
