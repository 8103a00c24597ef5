//! Service detection based on well-known port numbers.
//!
//! Provides mapping from port numbers to likely service names.

use std::collections::HashMap;
use std::sync::LazyLock;

/// Static map of well-known TCP ports to service names. Built on first
/// use and never mutated afterwards.
static PORT_SERVICES: LazyLock<HashMap<u16, &'static str>> = LazyLock::new(|| {
    HashMap::from([
        (20, "FTP"),
        (21, "FTP"),
        (22, "SSH"),
        (23, "Telnet"),
        (25, "SMTP"),
        (53, "DNS"),
        (69, "TFTP"),
        (80, "HTTP"),
        (88, "Kerberos"),
        (110, "POP3"),
        (111, "RPCbind"),
        (119, "NNTP"),
        (135, "MSRPC"),
        (139, "NetBIOS-SSN"),
        (143, "IMAP"),
        (179, "BGP"),
        (389, "LDAP"),
        (443, "HTTPS"),
        (445, "SMB"),
        (465, "SMTPS"),
        (514, "Syslog"),
        (515, "LPD"),
        (548, "AFP"),
        (554, "RTSP"),
        (587, "Submission"),
        (631, "IPP"),
        (636, "LDAPS"),
        (873, "Rsync"),
        (993, "IMAPS"),
        (995, "POP3S"),
        (1080, "SOCKS"),
        (1433, "MSSQL"),
        (1521, "Oracle"),
        (1723, "PPTP"),
        (1883, "MQTT"),
        (2049, "NFS"),
        (2181, "ZooKeeper"),
        (2375, "Docker"),
        (2376, "Docker-TLS"),
        (3000, "HTTP-Dev"),
        (3128, "Squid"),
        (3306, "MySQL"),
        (3389, "RDP"),
        (3690, "SVN"),
        (5000, "UPnP"),
        (5060, "SIP"),
        (5222, "XMPP"),
        (5432, "PostgreSQL"),
        (5672, "AMQP"),
        (5900, "VNC"),
        (5984, "CouchDB"),
        (6379, "Redis"),
        (6443, "Kubernetes-API"),
        (6667, "IRC"),
        (8000, "HTTP-Alt"),
        (8008, "HTTP-Alt"),
        (8080, "HTTP-Proxy"),
        (8443, "HTTPS-Alt"),
        (8888, "HTTP-Alt"),
        (9000, "CSlistener"),
        (9090, "Prometheus"),
        (9092, "Kafka"),
        (9200, "Elasticsearch"),
        (9418, "Git"),
        (11211, "Memcached"),
        (27017, "MongoDB"),
    ])
});

/// Look up the probable service name for a given port.
///
/// Returns `None` if the port is not in the well-known services table.
pub fn lookup(port: u16) -> Option<&'static str> {
    PORT_SERVICES.get(&port).copied()
}

/// Service name for display; "unknown" when the port is not recognized.
pub fn describe(port: u16) -> &'static str {
    lookup(port).unwrap_or("unknown")
}
