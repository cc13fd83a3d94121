//! # Scoped Bus Example
//!
//! A minimal dispatch loop on top of dynbus records.
//!
//! Two chat rooms register the same `Room` listener type with different scopes.
//! Messages posted to one room's partition never reach the other room, while the
//! statically tagged `Audit` listener sees traffic on its own tag only.
//!
//! Demonstrates:
//! - dynamic tags + suffix giving each registration its own partition
//! - producer replay to subscribers registered later
//! - thread affinity honored by the dispatch loop (not by dynbus)
//!
//! ## Run
//! ```bash
//! RUST_LOG=dynbus=debug cargo run --example scoped_bus
//! ```

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use dynbus::{
    DeclaredFinder, Finder, Listener, MethodTable, Payload, Produce, ProducerRecord, RoutingKey,
    Scope, Subscribe, SubscriberRecord, ThreadAffinity,
};
use tracing_subscriber::EnvFilter;

#[derive(Clone, Debug)]
struct Message {
    from: String,
    text: String,
}

struct Room {
    name: &'static str,
    history: Mutex<Vec<Message>>,
}

impl Room {
    fn new(name: &'static str) -> Arc<Self> {
        Arc::new(Self {
            name,
            history: Mutex::new(Vec::new()),
        })
    }

    fn on_message(&self, msg: &Message) {
        println!("[{}] {}: {}", self.name, msg.from, msg.text);
        self.history.lock().unwrap().push(msg.clone());
    }
}

impl Listener for Room {
    fn declare(table: &mut MethodTable<Self>) {
        table.subscribe(
            "on_message",
            Subscribe::new().on(ThreadAffinity::Background).dynamic_tag("room"),
            Room::on_message,
        );
    }
}

struct Audit;

impl Audit {
    fn on_message(&self, msg: &Message) {
        println!("[audit] {} said {:?}", msg.from, msg.text);
    }
}

impl Listener for Audit {
    fn declare(table: &mut MethodTable<Self>) {
        table.subscribe(
            "on_message",
            Subscribe::new().on(ThreadAffinity::Immediate).tag("audit"),
            Audit::on_message,
        );
    }
}

struct Greeter;

impl Listener for Greeter {
    fn declare(table: &mut MethodTable<Self>) {
        table.produce("welcome", Produce::new().tag("audit"), |_: &Greeter| Message {
            from: "greeter".into(),
            text: "welcome".into(),
        });
    }
}

/// Routes payloads to subscriber records by key.
#[derive(Default)]
struct Dispatcher {
    subscribers: HashMap<RoutingKey, Vec<SubscriberRecord>>,
    producers: HashMap<RoutingKey, ProducerRecord>,
}

impl Dispatcher {
    async fn register<L: Listener>(&mut self, listener: &Arc<L>, scope: &Scope) -> anyhow::Result<()> {
        let finder = DeclaredFinder::GLOBAL;

        for (key, records) in finder.find_all_subscribers(listener, scope)? {
            // replay the producer's last value to the new subscribers
            if let Some(producer) = self.producers.get(&key) {
                let value = producer.produce()?;
                for record in &records {
                    deliver(record.clone(), Arc::clone(&value)).await?;
                }
            }
            self.subscribers.entry(key).or_default().extend(records);
        }
        for (key, producer) in finder.find_all_producers(listener, scope)? {
            if let Some(records) = self.subscribers.get(&key) {
                let value = producer.produce()?;
                for record in records {
                    deliver(record.clone(), Arc::clone(&value)).await?;
                }
            }
            self.producers.insert(key, producer);
        }
        Ok(())
    }

    async fn post(&self, key: &RoutingKey, value: Payload) -> anyhow::Result<()> {
        for record in self.subscribers.get(key).into_iter().flatten() {
            deliver(record.clone(), Arc::clone(&value)).await?;
        }
        Ok(())
    }
}

async fn deliver(record: SubscriberRecord, value: Payload) -> anyhow::Result<()> {
    match record.affinity() {
        ThreadAffinity::Immediate | ThreadAffinity::Main | ThreadAffinity::Trampoline => {
            record.deliver(value.as_ref())?;
        }
        _ => {
            tokio::task::spawn_blocking(move || record.deliver(value.as_ref())).await??;
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut bus = Dispatcher::default();

    let red = Room::new("red");
    let blue = Room::new("blue");
    bus.register(&red, &Scope::new("room", "/red")).await?;
    bus.register(&blue, &Scope::new("room", "/blue")).await?;
    bus.register(&Arc::new(Greeter), &Scope::default()).await?;
    bus.register(&Arc::new(Audit), &Scope::default()).await?;

    let hello = Message {
        from: "ada".into(),
        text: "hello red".into(),
    };
    bus.post(&RoutingKey::of::<Message>("room/red")?, Arc::new(hello.clone()))
        .await?;
    bus.post(&RoutingKey::of::<Message>("audit")?, Arc::new(hello))
        .await?;

    println!();
    println!("Histories:");
    println!(" ├─► red:  {} message(s)", red.history.lock().unwrap().len());
    println!(" └─► blue: {} message(s)", blue.history.lock().unwrap().len());
    Ok(())
}
