pub mod connection;
pub mod headless;

pub use connection::connect_to_browser;
pub use headless::launch_headless_browser;

use chromiumoxide::Handler;
use futures::StreamExt;
use tokio::task::JoinHandle;
use tracing::debug;

/// 在后台处理浏览器事件，浏览器关闭或出错时退出
pub(crate) fn spawn_handler(mut handler: Handler) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(h) = handler.next().await {
            if h.is_err() {
                debug!("浏览器事件循环结束");
                break;
            }
        }
    })
}
