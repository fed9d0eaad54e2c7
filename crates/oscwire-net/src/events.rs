use oscwire_codec::{Bundle, CodecError, Message, Packet};

/// Observer for decoded packets.
///
/// Every method has an empty default, so implementors only override the
/// events they care about.
pub trait PacketHandler {
    /// Called once per received datagram, before any bundle or message event.
    fn on_packet(&mut self, _packet: &Packet) {}

    /// Called for the top-level bundle and for every nested bundle.
    fn on_bundle(&mut self, _bundle: &Bundle) {}

    /// Called for a top-level message and for every message inside a bundle.
    fn on_message(&mut self, _message: &Message) {}

    /// Called when a datagram fails to decode, unless errors are consumed.
    fn on_error(&mut self, _error: &CodecError) {}
}

impl<H: PacketHandler + ?Sized> PacketHandler for &mut H {
    fn on_packet(&mut self, packet: &Packet) {
        (**self).on_packet(packet);
    }

    fn on_bundle(&mut self, bundle: &Bundle) {
        (**self).on_bundle(bundle);
    }

    fn on_message(&mut self, message: &Message) {
        (**self).on_message(message);
    }

    fn on_error(&mut self, error: &CodecError) {
        (**self).on_error(error);
    }
}

impl<H: PacketHandler + ?Sized> PacketHandler for Box<H> {
    fn on_packet(&mut self, packet: &Packet) {
        (**self).on_packet(packet);
    }

    fn on_bundle(&mut self, bundle: &Bundle) {
        (**self).on_bundle(bundle);
    }

    fn on_message(&mut self, message: &Message) {
        (**self).on_message(message);
    }

    fn on_error(&mut self, error: &CodecError) {
        (**self).on_error(error);
    }
}

/// Fan a decoded packet out to `handler`.
///
/// Order: the packet itself, then either the message, or the bundle
/// followed by its children in append order, descending into nested
/// bundles before moving on to later siblings.
pub fn dispatch<H: PacketHandler + ?Sized>(packet: &Packet, handler: &mut H) {
    handler.on_packet(packet);
    match packet {
        Packet::Message(message) => handler.on_message(message),
        Packet::Bundle(bundle) => dispatch_bundle(bundle, handler),
    }
}

fn dispatch_bundle<H: PacketHandler + ?Sized>(bundle: &Bundle, handler: &mut H) {
    handler.on_bundle(bundle);
    for element in bundle.elements() {
        match element {
            Packet::Bundle(nested) => dispatch_bundle(nested, handler),
            Packet::Message(message) => handler.on_message(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use oscwire_codec::TimeTag;

    use super::*;

    #[derive(Default)]
    struct Recorder {
        events: Vec<String>,
    }

    impl PacketHandler for Recorder {
        fn on_packet(&mut self, packet: &Packet) {
            self.events.push(format!("packet {}", packet.address()));
        }

        fn on_bundle(&mut self, bundle: &Bundle) {
            self.events.push(format!("bundle {}", bundle.time_tag()));
        }

        fn on_message(&mut self, message: &Message) {
            self.events.push(format!("message {}", message.address()));
        }
    }

    fn tag(millis: u64) -> TimeTag {
        TimeTag::from_millis(millis).unwrap()
    }

    #[test]
    fn message_events() {
        let mut recorder = Recorder::default();
        dispatch(&Message::new("/solo").unwrap().into(), &mut recorder);
        assert_eq!(recorder.events, ["packet /solo", "message /solo"]);
    }

    #[test]
    fn nested_bundles_are_walked_depth_first() {
        let mut inner = Bundle::new(tag(2_000));
        inner.append(Message::new("/inner").unwrap()).unwrap();

        let mut outer = Bundle::new(tag(1_000));
        outer.append(Message::new("/first").unwrap()).unwrap();
        outer.append(inner).unwrap();
        outer.append(Message::new("/last").unwrap()).unwrap();

        let mut recorder = Recorder::default();
        dispatch(&outer.into(), &mut recorder);
        assert_eq!(
            recorder.events,
            [
                "packet #bundle",
                "bundle 1.000",
                "message /first",
                "bundle 2.000",
                "message /inner",
                "message /last",
            ]
        );
    }

    #[test]
    fn default_methods_are_noops() {
        struct Silent;
        impl PacketHandler for Silent {}

        let mut handler = Silent;
        dispatch(&Bundle::new(tag(1)).into(), &mut handler);
        handler.on_error(&CodecError::FormatMismatch("x".into()));
    }

    #[test]
    fn boxed_handlers_forward() {
        let mut boxed: Box<dyn PacketHandler> = Box::new(Recorder::default());
        dispatch(&Message::new("/b").unwrap().into(), &mut boxed);
    }
}
