use crate::config::{Parity, PortConfig, SerialConfig, TcpConfig};
use crate::ModbusProto;

#[test]
fn test_port_config_fits() {
    let serial: PortConfig = SerialConfig::default().into();
    let tcp: PortConfig = TcpConfig::default().into();
    assert!(serial.fits(ModbusProto::Rtu));
    assert!(serial.fits(ModbusProto::Ascii));
    assert!(!serial.fits(ModbusProto::Tcp));
    assert!(tcp.fits(ModbusProto::Tcp));
    assert!(!tcp.fits(ModbusProto::Rtu));
    assert!(!tcp.fits(ModbusProto::Ascii));
}

#[test]
fn test_port_config_defaults() {
    let serial = SerialConfig::default();
    assert_eq!(serial.port, 0);
    assert_eq!(serial.baud_rate, 19200);
    assert_eq!(serial.parity, Parity::Even);
    assert_eq!(TcpConfig::default().port, 502);
}

#[test]
fn test_default_modes_supported() {
    assert!(ModbusProto::Rtu.is_supported());
    assert!(ModbusProto::Ascii.is_supported());
    assert!(ModbusProto::Tcp.is_supported());
}

#[cfg(feature = "with_serde")]
mod serde_config {
    use crate::config::{Parity, PortConfig, SerialConfig, TcpConfig};
    use crate::ModbusProto;

    #[test]
    fn test_port_config_deserialize() {
        let json = r#"{"serial": {"port": 2, "baud_rate": 9600, "parity": "none"}}"#;
        let config: PortConfig = serde_json::from_str(json).unwrap();
        assert_eq!(
            config,
            PortConfig::Serial(SerialConfig {
                port: 2,
                baud_rate: 9600,
                parity: Parity::None,
            })
        );
        // missing fields fall back to defaults
        let config: PortConfig = serde_json::from_str(r#"{"tcp": {}}"#).unwrap();
        assert_eq!(config, PortConfig::Tcp(TcpConfig::default()));
        let json = r#"{"serial": {"baud_rate": 115200}}"#;
        let config: PortConfig = serde_json::from_str(json).unwrap();
        assert_eq!(
            config,
            PortConfig::Serial(SerialConfig {
                baud_rate: 115_200,
                ..SerialConfig::default()
            })
        );
    }

    #[test]
    fn test_proto_serde() {
        let proto: ModbusProto = serde_json::from_str(r#""ascii""#).unwrap();
        assert_eq!(proto, ModbusProto::Ascii);
        let serialized = serde_json::to_string(&ModbusProto::Tcp).unwrap();
        assert_eq!(serialized, r#""tcp""#);
        let config = PortConfig::Tcp(TcpConfig { port: 5020 });
        let serialized = serde_json::to_string(&config).unwrap();
        assert_eq!(serialized, r#"{"tcp":{"port":5020}}"#);
    }
}
