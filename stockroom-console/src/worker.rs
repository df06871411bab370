//! Runs [`Command`]s on spawned tasks and reports back over a channel

use std::future::Future;
use std::sync::Arc;

use stockroom_client::{ClientResult, FetchTicket, HttpClient, ProductService};
use tokio::sync::mpsc;

use crate::app::{Command, Message};

pub struct Worker<H> {
    service: Arc<ProductService<H>>,
    tx: mpsc::Sender<Message>,
}

impl<H: HttpClient + 'static> Worker<H> {
    pub fn new(service: ProductService<H>, tx: mpsc::Sender<Message>) -> Self {
        Self {
            service: Arc::new(service),
            tx,
        }
    }

    /// Spawn the requests for `command`; never blocks the UI loop
    pub fn dispatch(&self, command: Command) {
        match command {
            Command::Fetch(ticket) => self.list(ticket),
            Command::Reload(ticket) => {
                self.list(ticket);
                self.aggregates();
            }
            Command::Create(draft) => {
                let service = self.service.clone();
                self.mutate(mutated("create product"), async move {
                    service.create(&draft).await.map(|_| ())
                });
            }
            Command::Update(product) => {
                let service = self.service.clone();
                self.mutate(mutated("update product"), async move {
                    service.update(&product).await.map(|_| ())
                });
            }
            Command::ToggleStock(product) => {
                let service = self.service.clone();
                let id = product.id;
                let report = move |result| Message::StockChanged { id, result };
                self.mutate(report, async move {
                    service.set_stock(&product).await.map(|_| ())
                });
            }
            Command::Delete(id) => {
                let service = self.service.clone();
                self.mutate(mutated("delete product"), async move {
                    service.remove(id).await
                });
            }
        }
    }

    fn list(&self, ticket: FetchTicket) {
        let service = self.service.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = service.list(ticket.query()).await;
            send(&tx, Message::Listed(ticket, result)).await;
        });
    }

    fn aggregates(&self) {
        let service = self.service.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let (metrics, categories) = tokio::join!(service.metrics(), service.categories());
            send(&tx, Message::Metrics(metrics)).await;
            send(&tx, Message::Categories(categories)).await;
        });
    }

    fn mutate<R, F>(&self, report: R, request: F)
    where
        R: FnOnce(ClientResult<()>) -> Message + Send + 'static,
        F: Future<Output = ClientResult<()>> + Send + 'static,
    {
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = request.await;
            send(&tx, report(result)).await;
        });
    }
}

fn mutated(action: &'static str) -> impl FnOnce(ClientResult<()>) -> Message + Send + 'static {
    move |result| Message::Mutated { action, result }
}

async fn send(tx: &mpsc::Sender<Message>, message: Message) {
    if tx.send(message).await.is_err() {
        tracing::debug!("UI closed, dropping worker result");
    }
}
