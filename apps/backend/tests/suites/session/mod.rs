mod interceptor;
