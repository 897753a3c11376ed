use std::sync::Arc;

use participant_registry::{
    mailbox, AgentAddress, Event, EventListener, ParticipantRegistry, RegistryConfig, SpaceId,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let space = SpaceId::new();
    let registry: ParticipantRegistry<AgentAddress, dyn EventListener> =
        ParticipantRegistry::with_config(&RegistryConfig::from_env())?;

    let (listener, mut rx) = mailbox();
    let addr = AgentAddress::random(space);
    registry.put(addr, Arc::new(listener))?;

    let handle = tokio::spawn(async move {
        if let Some(ev) = rx.recv().await {
            println!("participant got: {:?}", ev);
        }
    });

    for (to, listener) in registry.entries() {
        let _ = listener.receive_event(Event::new(to.to_string(), &b"hello from the space"[..]));
    }

    registry.remove(&addr);
    handle.await?;
    println!("registry after leave: {:?}", registry);
    Ok(())
}
